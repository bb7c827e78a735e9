use eframe::egui::{self, Rect, Vec2};
use wmremover::config::{MAX_DISPLAY_HEIGHT, MAX_ZOOM, MIN_ZOOM};
use wmremover::ui::*;

#[test]
fn screen_to_buffer_is_zoom_invariant() {
    let buffer = Vec2::new(1000.0, 500.0);
    let base = Vec2::new(800.0, 400.0);
    let origin = egui::pos2(40.0, 30.0);

    for zoom in [1.0, 1.5, 3.0] {
        let rect = Rect::from_min_size(origin, base * zoom);
        let metrics = ViewMetrics::new(rect, buffer);
        // Same fraction of the displayed image must land on the same buffer pixel.
        let screen = origin + egui::vec2(0.25 * base.x * zoom, 0.5 * base.y * zoom);
        let mapped = metrics.screen_to_buffer(screen);
        assert!((mapped.x - 250.0).abs() < 1e-3, "zoom {zoom}: {mapped:?}");
        assert!((mapped.y - 250.0).abs() < 1e-3, "zoom {zoom}: {mapped:?}");
    }
}

#[test]
fn screen_to_buffer_clamps_outside_points() {
    let rect = Rect::from_min_size(egui::pos2(10.0, 10.0), egui::vec2(100.0, 50.0));
    let buffer = Vec2::new(200.0, 100.0);
    assert_eq!(
        to_buffer_space(egui::pos2(0.0, 0.0), rect, buffer),
        egui::pos2(0.0, 0.0)
    );
    assert_eq!(
        to_buffer_space(egui::pos2(500.0, 500.0), rect, buffer),
        egui::pos2(200.0, 100.0)
    );
}

#[test]
fn buffer_to_screen_inverts_screen_to_buffer() {
    let rect = Rect::from_min_size(egui::pos2(5.0, 7.0), egui::vec2(300.0, 150.0));
    let metrics = ViewMetrics::new(rect, Vec2::new(600.0, 300.0));
    let screen = egui::pos2(155.0, 82.0);
    let back = metrics.buffer_to_screen(metrics.screen_to_buffer(screen));
    assert!((back - screen).length() < 1e-3);
}

#[test]
fn drag_anchor_prefers_pointer_down_position() {
    let pressed = egui::pos2(10.0, 12.0);
    let moved = egui::pos2(16.0, 19.0);
    assert_eq!(drag_anchor(Some(pressed), Some(moved)), Some(pressed));
    assert_eq!(drag_anchor(None, Some(moved)), Some(moved));
    assert_eq!(drag_anchor(None, None), None);
}

#[test]
fn fit_to_container_respects_height_cap() {
    let wide = fit_to_container(Vec2::new(2000.0, 1000.0), 800.0, MAX_DISPLAY_HEIGHT);
    assert_eq!(wide, Vec2::new(800.0, 400.0));

    let tall = fit_to_container(Vec2::new(1000.0, 2000.0), 800.0, MAX_DISPLAY_HEIGHT);
    assert_eq!(tall, Vec2::new(300.0, 600.0));
}

#[test]
fn zoom_steps_and_clamps() {
    let mut zoom = Zoom::default();
    assert_eq!(zoom.factor(), MIN_ZOOM);
    assert_eq!(zoom.zoom_out(), MIN_ZOOM);
    assert_eq!(zoom.zoom_in(), 1.5);
    for _ in 0..10 {
        zoom.zoom_in();
    }
    assert_eq!(zoom.factor(), MAX_ZOOM);
    assert_eq!(zoom.adjust(-1.0), 3.0);
    zoom.reset();
    assert_eq!(zoom.factor(), MIN_ZOOM);
}

#[test]
fn zoom_gesture_moves_one_step_per_event() {
    let mut zoom = Zoom::default();
    assert_eq!(zoom.apply_gesture(1.0), None);
    assert_eq!(zoom.apply_gesture(1.1), Some(1.5));
    assert_eq!(zoom.apply_gesture(0.9), Some(1.0));
}

#[test]
fn loupe_stays_on_screen_near_edges() {
    let screen = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
    let buffer = Vec2::new(400.0, 300.0);

    for pointer in [
        egui::pos2(5.0, 5.0),
        egui::pos2(795.0, 5.0),
        egui::pos2(795.0, 595.0),
        egui::pos2(400.0, 300.0),
    ] {
        let loupe = Loupe::new(pointer, egui::pos2(10.0, 10.0), buffer, screen);
        assert!(screen.contains_rect(loupe.rect), "{pointer:?} -> {:?}", loupe.rect);
        assert_eq!(loupe.rect.width(), LOUPE_DIAMETER);
    }
}

#[test]
fn loupe_prefers_upper_right_and_flips() {
    let screen = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
    let buffer = Vec2::new(400.0, 300.0);

    let open = Loupe::new(egui::pos2(300.0, 300.0), egui::pos2(0.0, 0.0), buffer, screen);
    assert!(open.center().x > 300.0);
    assert!(open.center().y < 300.0);

    let corner = Loupe::new(egui::pos2(790.0, 10.0), egui::pos2(0.0, 0.0), buffer, screen);
    assert!(corner.center().x < 790.0);
    assert!(corner.center().y > 10.0);
}

#[test]
fn loupe_uv_spans_fixed_buffer_area() {
    let screen = Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(800.0, 600.0));
    let buffer = Vec2::new(300.0, 150.0);
    let loupe = Loupe::new(egui::pos2(100.0, 100.0), egui::pos2(150.0, 75.0), buffer, screen);
    assert!((loupe.uv.center() - egui::pos2(0.5, 0.5)).length() < 1e-5);
    assert!((loupe.uv.width() - LOUPE_SPAN / 300.0).abs() < 1e-5);
    assert!((loupe.uv.height() - LOUPE_SPAN / 150.0).abs() < 1e-5);
}
