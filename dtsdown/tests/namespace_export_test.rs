//! Tests for namespace re-export lowering.

use dtsdown::test_utils::downlevel_str;

#[test]
fn test_lowers_to_import_plus_named_export() {
    let out = downlevel_str("export * as rex from \"./m\";\n", "3.4");
    assert_eq!(
        out,
        "import * as rex_1 from \"./m\";\nexport { rex_1 as rex };\n"
    );
}

#[test]
fn test_comment_moves_to_the_export_statement() {
    let out = downlevel_str("// another comment\nexport * as rex from \"./m\";\n", "3.4");
    assert_eq!(
        out,
        "import * as rex_1 from \"./m\";\n//another comment\nexport { rex_1 as rex };\n"
    );
}

#[test]
fn test_generated_name_avoids_existing_bindings() {
    let out = downlevel_str(
        "import * as rex_1 from \"./x\";\nexport * as rex from \"./m\";\n",
        "3.4",
    );
    assert_eq!(
        out,
        "import * as rex_1 from \"./x\";\nimport * as rex_2 from \"./m\";\nexport { rex_2 as rex };\n"
    );
}

#[test]
fn test_default_namespace_export() {
    let out = downlevel_str("export * as default from \"./m\";\n", "3.4");
    assert_eq!(
        out,
        "import * as default_1 from \"./m\";\nexport { default_1 as default };\n"
    );
}

#[test]
fn test_survives_at_3_8() {
    let src = "export * as rex from \"./m\";\n";
    assert_eq!(downlevel_str(src, "3.8"), src);
}

#[test]
fn test_plain_star_export_is_untouched() {
    let src = "export * from \"./m\";\n";
    assert_eq!(downlevel_str(src, "3.4"), src);
}
