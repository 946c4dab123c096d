use dlpatch_parser::Parser;

#[test]
fn insert_prepends_a_new_call_before_the_existing_one() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nsub Main() { g(2)[insert]; }").unwrap();
    p.set_target("sub Main() { f(1); }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Main() {\n\tg(2);\n\tf(1);\n}");
}

#[test]
fn rename_keeps_position_but_changes_signature() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nsub Main() { f(1)[rename] f(9); g(2); }").unwrap();
    p.set_target("sub Main() { f(1); g(2); }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Main() {\n\tf(9);\n\tg(2);\n}");
}

#[test]
fn delete_removes_the_matched_call_only() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nsub Main() { f(1)[delete]; }").unwrap();
    p.set_target("sub Main() { f(1); g(3); }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Main() {\n\tg(3);\n}");
}

#[test]
fn nested_function_call_block_is_preserved() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nsub Main() { f(1) { h(2)[insert]; } }").unwrap();
    p.set_target("sub Main() { f(1) { k(3); } }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Main() {\n\tf(1) {\n\t\th(2);\n\t\tk(3);\n\t}\n}");
}

#[test]
fn use_statements_are_ordered_before_function_calls() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nsub Main() { use Wait()[insert]; f(1); }").unwrap();
    p.set_target("sub Main() { f(1); }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Main() {\n\tuse Wait();\n\tf(1);\n}");
}

#[test]
fn delete_of_absent_call_only_warns_and_leaves_target_untouched() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nsub Main() { z(99)[delete]; }").unwrap();
    p.set_target("sub Main() { f(1); }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Main() {\n\tf(1);\n}");
}

#[test]
fn noop_only_diff_reproduces_target_unchanged() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nsub Main() { f(1)[noop]; }").unwrap();
    p.set_target("sub Main() { f(1); }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Main() {\n\tf(1);\n}");
}

#[test]
fn inserted_import_is_prepended_before_surviving_imports() {
    let mut p = Parser::new();
    p.set_diff("scripts/Quest.scr\nimport \"c\"[insert]\nsub Main() { f(1); }").unwrap();
    p.set_target("import \"a\"\nimport \"b\"\nsub Main() { f(1); }").unwrap();
    assert_eq!(
        p.parse().unwrap(),
        "import \"c\"\nimport \"a\"\nimport \"b\"\nsub Main() {\n\tf(1);\n}"
    );
}

#[test]
fn root_sub_scope_rejects_insert_attribute() {
    let mut p = Parser::new();
    let err = p.set_diff("scripts/Quest.scr\nsub Main()[insert] { f(1); }");
    assert!(err.is_err());
}
