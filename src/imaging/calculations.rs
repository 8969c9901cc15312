//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Height of an image scaled to `target_width`, preserving aspect ratio.
///
/// Rounds to the nearest pixel and never returns 0. There is no upscale
/// guard: a target wider than the original scales up.
///
/// # Arguments
/// * `original` - Original image dimensions (width, height)
/// * `target_width` - Width of the derivative in pixels
pub fn scaled_height(original: (u32, u32), target_width: u32) -> u32 {
    let (orig_w, orig_h) = original;
    if orig_w == 0 {
        return orig_h.max(1);
    }
    let ratio = target_width as f64 / orig_w as f64;
    ((orig_h as f64 * ratio).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_downscale() {
        // 1920x1080 → 480 wide
        assert_eq!(scaled_height((1920, 1080), 480), 270);
    }

    #[test]
    fn portrait_downscale() {
        assert_eq!(scaled_height((1000, 1500), 480), 720);
    }

    #[test]
    fn upscale_is_allowed() {
        // 500x400 source, 1920 tier
        assert_eq!(scaled_height((500, 400), 1920), 1536);
    }

    #[test]
    fn rounds_to_nearest() {
        // 768 * 333 / 1000 = 255.744
        assert_eq!(scaled_height((1000, 333), 768), 256);
    }

    #[test]
    fn never_zero() {
        assert_eq!(scaled_height((10000, 1), 480), 1);
        assert_eq!(scaled_height((0, 0), 480), 1);
    }
}
