pub mod sticker;
