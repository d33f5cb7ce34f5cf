//! Tests for named tuple member lowering.

use dtsdown::test_utils::downlevel_str;

#[test]
fn test_labels_become_inline_comments() {
    let out = downlevel_str(
        "type J = [foo: string, bar: number, ...arr: boolean[]];\n",
        "3.4",
    );
    assert_eq!(
        out,
        "type J = [\n    /*foo*/ string,\n    /*bar*/ number,\n    /*arr*/ ...boolean[]\n];\n"
    );
}

#[test]
fn test_optional_label_unwraps_to_optional_element() {
    let out = downlevel_str("type K = [first: string, second?: number];\n", "3.4");
    assert_eq!(out, "type K = [\n    /*first*/ string,\n    /*second*/ number?\n];\n");
}

#[test]
fn test_unlabeled_tuples_are_untouched() {
    let src = "type T = [string, number, ...boolean[]];\n";
    assert_eq!(downlevel_str(src, "3.4"), src);
}

#[test]
fn test_labels_survive_at_4_0() {
    let src = "type J = [foo: string, bar: number];\n";
    assert_eq!(downlevel_str(src, "4.0"), src);
}

#[test]
fn test_labels_lower_at_3_9() {
    let out = downlevel_str("type J = [foo: string];\n", "3.9");
    assert_eq!(out, "type J = [\n    /*foo*/ string\n];\n");
}
