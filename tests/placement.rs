use air_folder::geometry::{placement, Anchor, Axis, Direction, Size};

const ANCHOR: Anchor = Anchor { x: 500.0, y: 200.0 };

fn size() -> Size {
    Size::new(120.0, 60.0)
}

#[test]
fn right_pins_left_edge() {
    let p = placement(ANCHOR, Direction::Right, size());
    assert_eq!(p.grow_axis, Axis::Horizontal);
    assert_eq!(p.pinned.left, 500.0);
    assert_eq!(p.pinned.width, 0.0);
    assert_eq!(p.settled.left, 500.0);
    assert_eq!(p.settled.right(), 620.0);
    assert_eq!(p.settled.top, 170.0);
    assert_eq!(p.scale_origin, (0.0, 0.5));
}

#[test]
fn left_pins_right_edge() {
    let p = placement(ANCHOR, Direction::Left, size());
    assert_eq!(p.pinned.left, 500.0);
    assert_eq!(p.settled.left, 380.0);
    assert_eq!(p.settled.right(), 500.0);
    assert_eq!(p.settled.top, 170.0);
    assert_eq!(p.scale_origin, (1.0, 0.5));
}

#[test]
fn up_pins_bottom_edge() {
    let p = placement(ANCHOR, Direction::Up, size());
    assert_eq!(p.grow_axis, Axis::Vertical);
    assert_eq!(p.pinned.top, 200.0);
    assert_eq!(p.pinned.height, 0.0);
    assert_eq!(p.pinned.width, 120.0);
    assert_eq!(p.settled.top, 140.0);
    assert_eq!(p.settled.bottom(), 200.0);
    assert_eq!(p.settled.left, 440.0);
    assert_eq!(p.scale_origin, (0.5, 1.0));
}

#[test]
fn down_pins_top_edge() {
    let p = placement(ANCHOR, Direction::Down, size());
    assert_eq!(p.settled.top, 200.0);
    assert_eq!(p.settled.bottom(), 260.0);
    assert_eq!(p.settled.left, 440.0);
    assert_eq!(p.scale_origin, (0.5, 0.0));
}

#[test]
fn cross_axis_is_centred_for_every_direction() {
    for dir in Direction::ALL {
        let p = placement(ANCHOR, dir, size());
        match p.grow_axis {
            Axis::Horizontal => {
                assert_eq!(p.settled.top + p.settled.height / 2.0, ANCHOR.y, "{dir}")
            }
            Axis::Vertical => {
                assert_eq!(p.settled.left + p.settled.width / 2.0, ANCHOR.x, "{dir}")
            }
        }
    }
}

#[test]
fn anchor_may_be_off_screen() {
    let p = placement(Anchor::new(-50.0, -20.0), Direction::Left, size());
    assert_eq!(p.settled.left, -170.0);
    assert_eq!(p.settled.top, -50.0);
}
