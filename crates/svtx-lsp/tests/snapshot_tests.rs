use super::*;

use svtx_common::TextSpan;

#[test]
fn test_identity_mapper_offsets() {
    let snapshot = TsxSnapshot::new("let a = 1;\nlet b = 2;\n", Box::new(IdentityMapper));
    assert_eq!(snapshot.generated_offset(Position::new(1, 4)), Some(15));
    assert!(snapshot.is_in_generated_region(Position::new(0, 0)));
}

#[test]
fn test_segment_mapper_roundtrip() {
    let mapper = SegmentMapper::new(vec![LineSegment {
        original_line: 2,
        generated_line: 5,
        column_shift: 4,
    }]);
    let generated = mapper.to_generated(Position::new(2, 3)).unwrap();
    assert_eq!(generated, Position::new(5, 7));
    assert_eq!(mapper.to_original(generated), Some(Position::new(2, 3)));

    // Unlisted lines are unmapped.
    assert_eq!(mapper.to_generated(Position::new(0, 0)), None);
    assert_eq!(mapper.to_original(Position::new(0, 0)), None);
}

#[test]
fn test_generated_span_roundtrip() {
    // A position known to be mappable translates to original coordinates
    // and back to the same generated offset.
    let text = "const x = 1;\nconst y = 2;\n";
    let snapshot = TsxSnapshot::new(text, Box::new(IdentityMapper));
    let span = TextSpan::from_bounds(19, 20);
    let range = snapshot.original_range(span).unwrap();
    assert_eq!(snapshot.offset_at(range.start), Some(19));
    assert_eq!(snapshot.offset_at(range.end), Some(20));
}

#[test]
fn test_original_range_unmapped_is_none() {
    let snapshot = TsxSnapshot::new(
        "line0\nline1\n",
        Box::new(SegmentMapper::new(vec![LineSegment {
            original_line: 0,
            generated_line: 0,
            column_shift: 0,
        }])),
    );
    // End of the span falls on an unmapped generated line.
    assert!(snapshot.original_range(TextSpan::from_bounds(2, 8)).is_none());
    assert!(snapshot.original_range(TextSpan::from_bounds(2, 4)).is_some());
}

#[test]
fn test_original_position_shifted() {
    // Generated line 1 is synthetic; line shifts compensate when mapping
    // spans that start on it.
    let mapper = SegmentMapper::new(vec![LineSegment {
        original_line: 1,
        generated_line: 0,
        column_shift: 0,
    }]);
    let snapshot = TsxSnapshot::new("import 'synthetic';\nlet a;\n", Box::new(mapper));
    let shifted = snapshot
        .original_position_shifted(Position::new(1, 0), -1)
        .unwrap();
    assert_eq!(shifted, Position::new(2, 0));
    // Direct mapping of the same position fails.
    assert_eq!(snapshot.original_position(Position::new(1, 0)), None);
}

#[test]
fn test_parse_error_flag() {
    let snapshot =
        TsxSnapshot::new("", Box::new(IdentityMapper)).with_parse_error(true);
    assert!(snapshot.has_parse_error());
}
