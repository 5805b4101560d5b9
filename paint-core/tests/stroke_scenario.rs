//! End-to-end stroke scenario: add a layer, draw a red line, undo, redo.

use paint_core::{EditorSession, Point, Rgb, SessionCommand, SessionConfig, Tool};

const RED: [u8; 4] = [255, 0, 0, 255];

fn red_line_session() -> EditorSession {
    let mut session = EditorSession::new(SessionConfig::with_size(64, 32)).expect("session");
    session.add_layer().expect("add layer");
    session.set_tool(Tool::Pen);
    session.set_brush_size(5);
    session.set_color_hex("#ff0000").expect("color");
    session.set_stabilization(0.0);
    session
}

fn draw_red_line(session: &mut EditorSession) {
    session.pointer_down(Point::new(10.0, 10.0));
    assert!(session.pointer_move(Point::new(30.0, 10.0)));
    assert!(session.pointer_move(Point::new(50.0, 10.0)));
    assert!(session.pointer_up().expect("pointer up"));
}

fn assert_red_line(session: &EditorSession) {
    let layer = session.layers().active_layer().buffer();
    for x in 10..50 {
        for y in 9..=11 {
            assert_eq!(layer.get_pixel(x, y).0, RED, "({x}, {y}) should be red");
        }
    }
    assert_eq!(layer.get_pixel(30, 14).0[3], 0);
    assert_eq!(layer.get_pixel(30, 6).0[3], 0);
    assert_eq!(layer.get_pixel(58, 10).0[3], 0);
}

#[test]
fn test_red_line_adds_one_history_entry() {
    let mut session = red_line_session();
    let depth = session.history().undo_depth();
    draw_red_line(&mut session);
    assert_eq!(session.history().undo_depth(), depth + 1);
    assert_eq!(session.layers().active_index(), 1);
    assert_red_line(&session);
    assert!(session.layers().get(0).expect("bottom").is_blank());
}

#[test]
fn test_red_line_undo_and_redo() {
    let mut session = red_line_session();
    draw_red_line(&mut session);

    assert!(session.undo().expect("undo"));
    assert_eq!(session.layers().len(), 2);
    assert!(session.layers().active_layer().is_blank());
    assert!(session.composite().pixels().all(|p| p.0[3] == 0));

    assert!(session.redo().expect("redo"));
    assert_red_line(&session);
    assert_eq!(session.composite().get_pixel(30, 10).0, RED);
}

#[test]
fn test_stabilized_stroke_lags_behind_pointer() {
    let mut session = red_line_session();
    session.set_stabilization(5.0);
    session.pointer_down(Point::new(10.0, 10.0));
    session.pointer_move(Point::new(50.0, 10.0));
    session.pointer_up().expect("pointer up");

    let layer = session.layers().active_layer().buffer();
    // Halfway at strength 5: the segment ends at x = 30.
    assert_eq!(layer.get_pixel(28, 10).0, RED);
    assert_eq!(layer.get_pixel(40, 10).0[3], 0);
}

#[test]
fn test_eraser_paints_background_over_ink() {
    let mut session = red_line_session();
    draw_red_line(&mut session);

    session.set_tool(Tool::Eraser);
    session.set_brush_size(9);
    session.pointer_down(Point::new(30.0, 0.0));
    session.pointer_move(Point::new(30.0, 31.0));
    session.pointer_up().expect("pointer up");

    let layer = session.layers().active_layer().buffer();
    assert_eq!(layer.get_pixel(30, 10).0, [255, 255, 255, 255]);
    assert_eq!(layer.get_pixel(12, 10).0, RED);
}

#[test]
fn test_scripted_scenario_matches_direct_calls() {
    let script = r##"[
        {"type": "add_layer"},
        {"type": "select_tool", "tool": "pen"},
        {"type": "set_brush_size", "size": 5},
        {"type": "set_color", "color": "#ff0000"},
        {"type": "set_stabilization", "strength": 0},
        {"type": "pointer_down", "x": 10, "y": 10},
        {"type": "pointer_move", "x": 30, "y": 10},
        {"type": "pointer_move", "x": 50, "y": 10},
        {"type": "pointer_up"}
    ]"##;
    let commands = SessionCommand::parse_script(script).expect("script");
    let mut scripted = EditorSession::new(SessionConfig::with_size(64, 32)).expect("session");
    for command in &commands {
        scripted.apply(command).expect("apply");
    }

    let mut direct = red_line_session();
    draw_red_line(&mut direct);

    assert_eq!(scripted.composite(), direct.composite());
    assert_eq!(scripted.brush().color, Rgb::new(255, 0, 0));
}
