pub mod deribit;
pub mod ithaca;
pub mod moby;
pub mod zomma;
