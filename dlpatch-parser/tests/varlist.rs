use dlpatch_parser::Parser;

#[test]
fn insert_attribute_is_forbidden_on_a_vardecl() {
    let mut p = Parser::new();
    let err = p.set_diff("scripts/varlist.scr\nVarInt(\"n\", 1)[insert]");
    assert!(err.is_err());
}

#[test]
fn inserted_include_is_prepended_before_surviving_includes() {
    let mut p = Parser::new();
    p.set_diff("scripts/varlist.scr\n!include(\"c.scr\")[insert]").unwrap();
    p.set_target("!include(\"a.scr\")\n!include(\"b.scr\")").unwrap();
    assert_eq!(
        p.parse().unwrap(),
        "!include(\"c.scr\")\n!include(\"a.scr\")\n!include(\"b.scr\")"
    );
}

#[test]
fn redefine_attribute_is_forbidden_on_an_include() {
    let mut p = Parser::new();
    let err = p.set_diff("scripts/varlist.scr\n!include(\"a.scr\")[redefine] !include(\"b.scr\")");
    assert!(err.is_err());
}

#[test]
fn redefine_on_a_vardecl_is_not_supported_and_only_warns() {
    // Redefine only has a defined meaning for exports, sub scopes, sub declarations and
    // functions; on any other kind `merge_node` logs a warning and leaves the matched
    // target node's signature untouched.
    let mut p = Parser::new();
    p.set_diff("scripts/varlist.scr\nVarInt(\"n\", 1)[redefine] VarInt(\"n\", 9)").unwrap();
    p.set_target("VarInt(\"n\", 1)").unwrap();
    assert_eq!(p.parse().unwrap(), "VarInt(\"n\", 1)");
}

#[test]
fn rename_changes_an_include_path() {
    let mut p = Parser::new();
    p.set_diff("scripts/varlist.scr\n!include(\"a.scr\")[rename] !include(\"b.scr\")").unwrap();
    p.set_target("!include(\"a.scr\")").unwrap();
    assert_eq!(p.parse().unwrap(), "!include(\"b.scr\")");
}

#[test]
fn delete_of_absent_vardecl_only_warns_and_leaves_target_unchanged() {
    let mut p = Parser::new();
    p.set_diff("scripts/varlist.scr\nVarInt(\"missing\", 0)[delete]").unwrap();
    p.set_target("VarInt(\"n\", 1)").unwrap();
    assert_eq!(p.parse().unwrap(), "VarInt(\"n\", 1)");
}

#[test]
fn includes_and_vardecls_are_segregated_and_kept_in_target_order() {
    let mut p = Parser::new();
    p.set_diff("scripts/varlist.scr\nVarInt(\"b\", 2)[rename] VarInt(\"b\", 20)").unwrap();
    p.set_target("!include(\"a.scr\")\nVarInt(\"a\", 1)\nVarInt(\"b\", 2)\n!include(\"c.scr\")").unwrap();
    assert_eq!(
        p.parse().unwrap(),
        "!include(\"a.scr\")\n!include(\"c.scr\")\nVarInt(\"a\", 1)\nVarInt(\"b\", 20)"
    );
}

#[test]
fn vardecl_length_mismatch_in_the_diff_is_a_hard_error() {
    let mut p = Parser::new();
    let err = p.set_diff("scripts/varlist.scr\nVarVec3(\"v\", [1.0, 2.0])");
    assert!(err.is_err());
}

#[test]
fn a_lone_noop_vardecl_with_no_attribute_tag_is_elided_and_target_is_unchanged() {
    let mut p = Parser::new();
    p.set_diff("scripts/varlist.scr\nVarInt(\"n\", 1)").unwrap();
    p.set_target("VarInt(\"n\", 1)\nVarInt(\"m\", 2)").unwrap();
    assert_eq!(p.parse().unwrap(), "VarInt(\"n\", 1)\nVarInt(\"m\", 2)");
}
