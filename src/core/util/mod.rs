pub mod qr_util;
pub mod signature_util;
