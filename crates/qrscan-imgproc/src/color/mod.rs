mod gray;
mod yuv;

pub use gray::gray_from_rgb_u8;
pub use yuv::rgb_from_yuyv;
