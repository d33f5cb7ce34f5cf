//! Tests for assertion-return erasure.

use dtsdown::test_utils::downlevel_str;

#[test]
fn test_asserts_with_narrowing_becomes_void() {
    let out = downlevel_str(
        "declare function assertIsString(val: any, msg?: string): asserts val is string;\n",
        "3.4",
    );
    assert_eq!(
        out,
        "declare function assertIsString(val: any, msg?: string): void;\n"
    );
}

#[test]
fn test_bare_asserts_becomes_void() {
    let out = downlevel_str(
        "declare function assert(val: any, msg?: string): asserts val;\n",
        "3.4",
    );
    assert_eq!(out, "declare function assert(val: any, msg?: string): void;\n");
}

#[test]
fn test_plain_type_predicate_is_untouched() {
    let src = "declare function guardIsString(val: any): val is string;\n";
    assert_eq!(downlevel_str(src, "3.4"), src);
}

#[test]
fn test_method_signature_is_erased() {
    let out = downlevel_str(
        "export interface Checker {\n    check(val: unknown): asserts val is string;\n}\n",
        "3.4",
    );
    assert_eq!(
        out,
        "export interface Checker {\n    check(val: unknown): void;\n}\n"
    );
}

#[test]
fn test_function_type_in_alias_is_erased() {
    let out = downlevel_str(
        "export declare type Asserts<T> = (val: unknown) => asserts val is T;\n",
        "3.4",
    );
    assert_eq!(out, "export declare type Asserts<T> = (val: unknown) => void;\n");
}

#[test]
fn test_nested_function_type_in_object_literal_is_erased() {
    let out = downlevel_str(
        "export declare const foo: {\n    bar: {\n        baz: <T>(val: unknown) => asserts val is T;\n    };\n};\n",
        "3.4",
    );
    assert_eq!(
        out,
        "export declare const foo: {\n    bar: {\n        baz: <T>(val: unknown) => void;\n    };\n};\n"
    );
}

#[test]
fn test_asserts_survives_at_3_7() {
    let src = "declare function assert(val: any): asserts val;\n";
    assert_eq!(downlevel_str(src, "3.7"), src);
}

#[test]
fn test_comment_stays_with_erased_function() {
    let out = downlevel_str(
        "/** side-effects! */\ndeclare function assertIsString(val: any): asserts val is string;\n",
        "3.4",
    );
    assert_eq!(
        out,
        "/** side-effects! */\ndeclare function assertIsString(val: any): void;\n"
    );
}
