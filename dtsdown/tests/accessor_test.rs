//! Tests for accessor-pair lowering.

#![allow(clippy::unwrap_used)]

use dtsdown::downlevel::downlevel_source;
use dtsdown::test_utils::downlevel_str;
use std::path::Path;

#[test]
fn test_getter_setter_pair_collapses_to_one_property() {
    let out = downlevel_str(
        "export class C {\n    get p(): number;\n    set p(v: number);\n}\n",
        "3.4",
    );
    assert_eq!(out, "export class C {\n    p: number;\n}\n");
}

#[test]
fn test_getter_only_becomes_readonly() {
    let out = downlevel_str("export class C {\n    get q(): string;\n}\n", "3.4");
    assert_eq!(out, "export class C {\n    readonly q: string;\n}\n");
}

#[test]
fn test_missing_return_type_defaults_to_any() {
    let out = downlevel_str("export class C {\n    get q();\n}\n", "3.4");
    assert_eq!(out, "export class C {\n    readonly q: any;\n}\n");
}

#[test]
fn test_setter_only_stays_writable() {
    let out = downlevel_str(
        "export class C {\n    private set r(value: boolean);\n}\n",
        "3.4",
    );
    assert_eq!(out, "export class C {\n    private r: boolean;\n}\n");
}

#[test]
fn test_setter_only_missing_param_type_defaults_to_any() {
    let out = downlevel_str("export class C {\n    set r(value);\n}\n", "3.4");
    assert_eq!(out, "export class C {\n    r: any;\n}\n");
}

#[test]
fn test_accessor_modifiers_carry_over() {
    let out = downlevel_str(
        "export class C {\n    protected get p(): number;\n    protected set p(value: number);\n    public get q(): string;\n}\n",
        "3.4",
    );
    assert_eq!(
        out,
        "export class C {\n    protected p: number;\n    public readonly q: string;\n}\n"
    );
}

#[test]
fn test_abstract_setter_keeps_abstract() {
    let out = downlevel_str(
        "export class C {\n    abstract set r(value: boolean);\n}\n",
        "3.4",
    );
    assert_eq!(out, "export class C {\n    abstract r: boolean;\n}\n");
}

#[test]
fn test_pair_order_does_not_matter() {
    let out = downlevel_str(
        "export class C {\n    set p(v: number);\n    get p(): number;\n}\n",
        "3.4",
    );
    assert_eq!(out, "export class C {\n    p: number;\n}\n");
}

#[test]
fn test_accessor_comments_merge_onto_property() {
    let out = downlevel_str(
        "export class C {\n    /** getter docs */\n    get p(): number;\n    /** setter docs */\n    set p(v: number);\n}\n",
        "3.4",
    );
    assert_eq!(
        out,
        "export class C {\n    /** getter docs\n     * setter docs*/\n    p: number;\n}\n"
    );
}

#[test]
fn test_accessors_survive_at_3_6() {
    let src = "export class C {\n    get p(): number;\n    set p(v: number);\n}\n";
    assert_eq!(downlevel_str(src, "3.6"), src);
}

#[test]
fn test_parameterless_setter_is_fatal() {
    let result = downlevel_source(
        "export class C {\n    set r();\n}\n",
        Path::new("test.d.ts"),
        "3.4".parse().unwrap(),
    );
    assert!(result.is_err());
}
