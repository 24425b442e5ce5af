pub mod garments;
