pub mod redstone;
