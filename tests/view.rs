use std::io::BufReader;

use num_bigint::BigInt;

use penrose_exact::errors::ErrorKind;
use penrose_exact::{PenroseTree, Rational, Step, ViewSpec};

const SAMPLE: &str = "\
# five pixel pan to the right, then zoom in
center 0 0
pixel_size 1/50
canvas 500 500
precision 9
draw_level 1
inner_frame 0.1 0.9

pan 5 0
zoom 2
";

#[test]
fn parse_from_reader() {

    let mut reader = BufReader::new(SAMPLE.as_bytes());
    let spec = ViewSpec::parse("sample.view", &mut reader).unwrap();

    assert_eq!(spec.precision, BigInt::from(1_000_000_000));
    assert_eq!(spec.draw_level, 1);
    assert_eq!(spec.inner_frame, (0.1, 0.9));
    assert_eq!(spec.steps, vec![Step::Pan(5, 0), Step::Zoom(Rational::from_integer(2))]);

}

#[test]
fn errors_name_the_line() {

    let err = ViewSpec::parse_str("canvas 10 10\n\ncanvas 20 20\n").unwrap_err();
    assert!(err.to_string().contains(":3:"), "{}", err);

    let err = ViewSpec::parse_str("center 1/0 0\n").unwrap_err();
    let found = err.iter().any(|e| e.to_string().contains("invalid rational")
                                    || e.to_string().contains("division by zero"));
    assert!(found, "{}", err);

    let err = ViewSpec::parse_str("zoom_out 2\n").unwrap_err();
    assert!(err.iter().any(|e| e.to_string() == "unrecognized keyword"), "{}", err);

    match ViewSpec::parse_str("zoom 1/0\n").unwrap_err().kind() {
        ErrorKind::Msg(msg) => assert!(msg.contains(":1:"), "{}", msg),
        other => panic!("unexpected error {:?}", other),
    }

}

#[test]
fn steps_drive_the_tree() {

    let spec = ViewSpec::parse_str(SAMPLE).unwrap();
    let viewports = spec.viewports().unwrap();

    assert_eq!(viewports.len(), 3);
    assert_eq!(viewports[1].center_x, Rational::new(1, 10).unwrap());
    assert_eq!(viewports[2].pixel_size, Rational::new(1, 100).unwrap());

    let mut tree = PenroseTree::new(&viewports[0].bbox(&spec.precision));
    let start = tree.level();

    for vp in &viewports[1..] {
        tree.update(&vp.bbox(&spec.precision)).unwrap();
        assert!(tree.level() <= start);
        assert!(!tree.tiles(0).is_empty());
    }

    // zooming in halves the box, so the tree never needs to grow
    let fresh = PenroseTree::new(&viewports[2].bbox(&spec.precision));
    assert_eq!(tree.level(), fresh.level());
    assert_eq!(tree.tiles(0).len(), fresh.tiles(0).len());

}
