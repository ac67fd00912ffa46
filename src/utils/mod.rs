pub mod framebuffer;
pub mod img_stuffs;
