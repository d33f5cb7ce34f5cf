//! Tests for type-only import/export stripping.

use dtsdown::test_utils::downlevel_str;

#[test]
fn test_type_only_import_loses_qualifier() {
    let out = downlevel_str("import type { C as CD } from \"./src/test\";\n", "3.4");
    assert_eq!(out, "import { C as CD } from \"./src/test\";\n");
}

#[test]
fn test_type_only_default_import_loses_qualifier() {
    let out = downlevel_str("import type Foo from \"./foo\";\n", "3.4");
    assert_eq!(out, "import Foo from \"./foo\";\n");
}

#[test]
fn test_type_only_namespace_import_loses_qualifier() {
    let out = downlevel_str("import type * as ns from \"./ns\";\n", "3.4");
    assert_eq!(out, "import * as ns from \"./ns\";\n");
}

#[test]
fn test_type_only_export_loses_qualifier() {
    let out = downlevel_str("export type { E } from \"./e\";\n", "3.4");
    assert_eq!(out, "export { E } from \"./e\";\n");
}

#[test]
fn test_local_type_only_export_loses_qualifier() {
    let out = downlevel_str("interface E {\n}\nexport type { E };\n", "3.4");
    assert_eq!(out, "interface E {\n}\nexport { E };\n");
}

#[test]
fn test_comment_stays_with_stripped_import() {
    let out = downlevel_str(
        "/** is this a single-line comment? */\nimport type { C as CD } from \"./src/test\";\n",
        "3.4",
    );
    assert_eq!(
        out,
        "/** is this a single-line comment? */\nimport { C as CD } from \"./src/test\";\n"
    );
}

#[test]
fn test_survive_at_3_8() {
    let src = "import type { C } from \"./c\";\nexport type { C };\n";
    assert_eq!(downlevel_str(src, "3.8"), src);
}

#[test]
fn test_plain_imports_are_untouched() {
    let src = "import { C } from \"./c\";\nimport \"./side-effect\";\n";
    assert_eq!(downlevel_str(src, "3.4"), src);
}
