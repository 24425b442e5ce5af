pub mod garments;
pub mod outfits;
