use image::{Rgba, RgbaImage};
use rand::{rngs::StdRng, SeedableRng};
use wmremover::inpaint::*;
use wmremover::selection::PixelRect;

fn column_ramp(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| Rgba([x as u8, 0, 0, 255]))
}

#[test]
fn ties_resolve_left_right_top_bottom() {
    assert_eq!(nearest_edge(3, 3, 3, 3), Edge::Left);
    assert_eq!(nearest_edge(4, 3, 3, 3), Edge::Right);
    assert_eq!(nearest_edge(4, 4, 3, 3), Edge::Top);
    assert_eq!(nearest_edge(4, 4, 4, 3), Edge::Bottom);
}

#[test]
fn fill_mirrors_across_nearest_wall_without_jitter() {
    let mut image = column_ramp(40, 40);
    let mut rng = StdRng::seed_from_u64(1);
    fill_region(&mut image, PixelRect::new(10, 10, 10, 10), 0, &mut rng);

    // (10, 15) is nearest to the left wall: source x = 10 - 0 - 1.
    assert_eq!(image.get_pixel(10, 15).0, [9, 0, 0, 255]);
    // (19, 15) is nearest to the right wall: source x = 20 + 1 + 1.
    assert_eq!(image.get_pixel(19, 15).0, [22, 0, 0, 255]);
    // (15, 10) sits on the top wall: same column, row above the hole.
    assert_eq!(image.get_pixel(15, 10).0, [15, 0, 0, 255]);
}

#[test]
fn fill_clamps_sources_at_the_buffer_border() {
    let mut image = column_ramp(12, 12);
    let mut rng = StdRng::seed_from_u64(7);
    fill_region(&mut image, PixelRect::new(0, 0, 12, 12), 2, &mut rng);
    assert!(image.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn degenerate_rect_is_rejected() {
    let image = column_ramp(20, 20);
    let mut rng = StdRng::seed_from_u64(3);
    let params = InpaintParams::default();
    assert!(remove_region(&image, PixelRect::new(2, 2, 4, 10), &params, &mut rng).is_none());
    assert!(remove_region(&image, PixelRect::new(30, 30, 8, 8), &params, &mut rng).is_none());
}

#[test]
fn same_seed_gives_same_fill() {
    let image = RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 3) as u8, (y * 5) as u8, 90, 255]));
    let rect = PixelRect::new(20, 24, 16, 12);
    let params = InpaintParams::default();
    let a = remove_region(&image, rect, &params, &mut StdRng::seed_from_u64(42)).unwrap();
    let b = remove_region(&image, rect, &params, &mut StdRng::seed_from_u64(42)).unwrap();
    assert_eq!(a, b);
}
