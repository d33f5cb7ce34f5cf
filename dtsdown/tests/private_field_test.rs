//! Tests for private-field desugaring.

use dtsdown::test_utils::downlevel_str;

#[test]
fn test_private_marker_gets_class_qualified_name() {
    let out = downlevel_str("export class G {\n    #private\n}\n", "3.4");
    assert_eq!(out, "export class G {\n    private \"G.#private\";\n}\n");
}

#[test]
fn test_each_class_namespaces_its_own_marker() {
    let out = downlevel_str(
        "export class G {\n    #private\n}\nexport class H extends G {\n    #private\n}\n",
        "3.4",
    );
    assert_eq!(
        out,
        "export class G {\n    private \"G.#private\";\n}\nexport class H extends G {\n    private \"H.#private\";\n}\n"
    );
}

#[test]
fn test_anonymous_class_uses_placeholder_name() {
    let out = downlevel_str("export default class {\n    #private\n}\n", "3.4");
    assert_eq!(
        out,
        "export default class {\n    private \"(anonymous).#private\";\n}\n"
    );
}

#[test]
fn test_declared_type_is_dropped() {
    let out = downlevel_str("export class G {\n    #private: string;\n}\n", "3.4");
    assert_eq!(out, "export class G {\n    private \"G.#private\";\n}\n");
}

#[test]
fn test_marker_survives_at_3_8() {
    let src = "export class G {\n    #private;\n}\n";
    assert_eq!(downlevel_str(src, "3.8"), src);
}

#[test]
fn test_named_private_fields_are_not_the_marker() {
    let src = "export class G {\n    #value: number;\n}\n";
    assert_eq!(downlevel_str(src, "3.4"), src);
}
