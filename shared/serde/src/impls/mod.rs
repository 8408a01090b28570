mod collections;
mod number;
