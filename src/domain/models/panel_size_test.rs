use super::PanelSize;

#[test]
fn it_defaults_within_bounds() {
    let size = PanelSize::default();
    assert_eq!(size, size.clamped());
    assert_eq!(size.width, 40);
    assert_eq!(size.height, 80);
}

#[test]
fn it_clamps_into_bounds() {
    let low = PanelSize {
        width: 10,
        height: 0,
    }
    .clamped();
    assert_eq!(
        low,
        PanelSize {
            width: 40,
            height: 50
        }
    );

    let high = PanelSize {
        width: 100,
        height: 100,
    }
    .clamped();
    assert_eq!(
        high,
        PanelSize {
            width: 80,
            height: 95
        }
    );
}

#[test]
fn it_parses_stored_json() {
    let size = PanelSize::parse(r#"{"width":55,"height":70}"#).unwrap();
    assert_eq!(
        size,
        PanelSize {
            width: 55,
            height: 70
        }
    );
}

#[test]
fn it_raises_stored_values_to_the_minimums() {
    let size = PanelSize::parse(r#"{"width":30,"height":20}"#).unwrap();
    assert_eq!(
        size,
        PanelSize {
            width: 40,
            height: 50
        }
    );
}

#[test]
fn it_rejects_malformed_json() {
    assert!(PanelSize::parse("not json").is_none());
    assert!(PanelSize::parse(r#"{"width":55}"#).is_none());
}

#[test]
fn it_serializes_like_the_stored_format() {
    let size = PanelSize {
        width: 45,
        height: 85,
    };
    assert_eq!(size.to_json(), r#"{"width":45,"height":85}"#);
    assert_eq!(PanelSize::parse(&size.to_json()), Some(size));
}
