//! Full caption session: drag, pinch, rotate, export and restore elsewhere.

use caption_core::{
    CaptionContent, CaptionEvent, Container, EngineConfig, GeometryRecord, PointerEvent,
    RecordSize, Size, TextStyle,
};
use glam::DVec2;

fn approx(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

fn layout(width: f64, height: f64) -> Container {
    Container::new(Size::new(width, height), EngineConfig::default()).unwrap()
}

fn count(events: &[CaptionEvent], pred: impl Fn(&CaptionEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn test_drag_pinch_rotate_export_import() {
    let mut container = layout(1000.0, 1000.0);
    let id = container.add(
        CaptionContent::text("caption", TextStyle::default()),
        Size::new(200.0, 100.0),
    );
    container.request_focus(id).unwrap();
    let mut events = Vec::new();

    // Drag by (+50, -30)
    events.extend(container.handle_pointer(&PointerEvent::down(0, 500.0, 500.0, 0.0)));
    events.extend(container.handle_pointer(&PointerEvent::moved(0, 550.0, 470.0, 16.0)));
    events.extend(container.handle_pointer(&PointerEvent::up(0, 550.0, 470.0, 32.0)));
    let overlay = container.overlay(id).unwrap();
    assert!((overlay.center() - DVec2::new(550.0, 470.0)).length() < 1e-9);

    // Pinch out by 1.2
    events.extend(container.handle_pointer(&PointerEvent::down(0, 500.0, 470.0, 1000.0)));
    events.extend(container.handle_pointer(&PointerEvent::down(1, 600.0, 470.0, 1005.0)));
    events.extend(container.handle_pointer(&PointerEvent::moved(1, 620.0, 470.0, 1020.0)));
    events.extend(container.handle_pointer(&PointerEvent::up(1, 620.0, 470.0, 1040.0)));
    events.extend(container.handle_pointer(&PointerEvent::up(0, 500.0, 470.0, 1050.0)));
    let overlay = container.overlay(id).unwrap();
    assert!(approx(overlay.scale(), 1.2, 1e-9));
    let upright = overlay.transform().upright_rect();
    assert!(approx(upright.width(), 240.0, 1e-6));
    assert!(approx(upright.height(), 120.0, 1e-6));
    assert!((overlay.center() - DVec2::new(550.0, 470.0)).length() < 1e-6);

    // Rotate by 95 degrees with two pointers, in five steps
    let anchor = DVec2::new(490.0, 470.0);
    events.extend(container.handle_pointer(&PointerEvent::down(0, anchor.x, anchor.y, 2000.0)));
    events.extend(container.handle_pointer(&PointerEvent::down(1, 610.0, 470.0, 2005.0)));
    for step in 1..=5 {
        let angle = (19.0 * step as f64).to_radians();
        let p = anchor + 120.0 * DVec2::new(angle.cos(), angle.sin());
        events.extend(container.handle_pointer(&PointerEvent::moved(
            1,
            p.x,
            p.y,
            2005.0 + 16.0 * step as f64,
        )));
    }
    events.extend(container.handle_pointer(&PointerEvent::up(1, 0.0, 0.0, 2200.0)));
    events.extend(container.handle_pointer(&PointerEvent::up(0, anchor.x, anchor.y, 2210.0)));
    let overlay = container.overlay(id).unwrap();
    assert!(approx(overlay.degree(), 95.0, 1e-6));
    assert!(approx(overlay.scale(), 1.2, 1e-6));

    // Three manipulations, three start/end pairs, no clicks
    assert_eq!(
        count(&events, |e| matches!(e, CaptionEvent::GestureStart { .. })),
        3
    );
    assert_eq!(
        count(&events, |e| matches!(e, CaptionEvent::GestureEnd { .. })),
        3
    );
    assert_eq!(
        count(&events, |e| matches!(e, CaptionEvent::InsideClick { .. })),
        0
    );

    // Export at 1000x1000
    let record = container.export(id).unwrap();
    assert!((record.center - DVec2::new(0.55, 0.47)).length() < 1e-6);
    let RecordSize::Relative { width, height } = record.size else {
        panic!("expected a relative size");
    };
    assert!(approx(width, 0.24, 1e-6));
    assert!(approx(height, 0.12, 1e-6));
    assert!(approx(record.degree, 95.0, 1e-6));

    // Persist and restore into 2000x500
    let json = record.to_json().unwrap();
    let record = GeometryRecord::from_json(&json).unwrap();
    let mut other = layout(2000.0, 500.0);
    let restored = other.add_from_record(&record);
    let overlay = other.overlay(restored).unwrap();
    assert!((overlay.center() - DVec2::new(1100.0, 235.0)).length() < 1e-6);
    let upright = overlay.transform().upright_rect();
    assert!(approx(upright.width(), 480.0, 1e-6));
    assert!(approx(upright.height(), 60.0, 1e-6));
    assert!(approx(overlay.degree(), 95.0, 1e-6));
}

#[test]
fn test_click_versus_drag() {
    let mut container = layout(1000.0, 1000.0);
    let id = container.add(CaptionContent::image("sticker.png"), Size::new(200.0, 100.0));
    container.request_focus(id).unwrap();

    // A still tap clicks once
    let mut events = container.handle_pointer(&PointerEvent::down(0, 500.0, 500.0, 0.0));
    events.extend(container.handle_pointer(&PointerEvent::up(0, 500.0, 500.0, 50.0)));
    assert_eq!(events, vec![CaptionEvent::InsideClick { overlay: id }]);

    // A drag past the slop never clicks and pairs start with end
    let mut events = container.handle_pointer(&PointerEvent::down(0, 500.0, 500.0, 100.0));
    events.extend(container.handle_pointer(&PointerEvent::moved(0, 520.0, 500.0, 110.0)));
    events.extend(container.handle_pointer(&PointerEvent::up(0, 520.0, 500.0, 120.0)));
    assert_eq!(
        events,
        vec![
            CaptionEvent::GestureStart { overlay: id },
            CaptionEvent::Redraw { overlay: id },
            CaptionEvent::GestureEnd { overlay: id },
        ]
    );
}

#[test]
fn test_corner_handle_snaps_to_axis() {
    let mut container = layout(1000.0, 1000.0);
    let id = container.add(
        CaptionContent::text("snap", TextStyle::default()),
        Size::new(200.0, 100.0),
    );
    container.request_focus(id).unwrap();
    let center = DVec2::new(500.0, 500.0);
    let handle = DVec2::new(600.0, 550.0);
    let at = |degrees: f64| {
        center + glam::DMat2::from_angle(degrees.to_radians()) * (handle - center)
    };

    container.handle_pointer(&PointerEvent::down(0, handle.x, handle.y, 0.0));
    let p = at(5.0);
    container.handle_pointer(&PointerEvent::moved(0, p.x, p.y, 16.0));
    assert_eq!(container.overlay(id).unwrap().degree(), 0.0);

    let p = at(15.0);
    container.handle_pointer(&PointerEvent::moved(0, p.x, p.y, 32.0));
    assert!(approx(container.overlay(id).unwrap().degree(), 15.0, 1e-6));
    container.handle_pointer(&PointerEvent::up(0, p.x, p.y, 48.0));
}
