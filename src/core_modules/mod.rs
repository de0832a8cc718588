pub mod cubemap;
pub mod direction;
pub mod equirectangular;
pub mod numeric;
pub mod projection;
