use dlpatch_cache::StringCache;
use dlpatch_parser::builder::{self, FileType};
use dlpatch_parser::Parser;

#[test]
fn redefine_replaces_a_subs_entire_body() {
    let mut p = Parser::new();
    p.set_diff("scripts/loot.loot\nsub Roll(int n = 1)[redefine] { drop(\"gold\")[insert]; }").unwrap();
    p.set_target("sub Roll(int n = 1) { drop(\"scrap\"); }").unwrap();
    assert_eq!(p.parse().unwrap(), "sub Roll(int n = 1) {\n\tdrop(\"gold\");\n}");
}

#[test]
fn default_merge_recurses_into_a_subs_body() {
    let mut p = Parser::new();
    p.set_diff("scripts/loot.loot\nsub Roll(int n = 1) { bonus(2)[insert]; drop(\"scrap\"); }").unwrap();
    p.set_target("sub Roll(int n = 1) { drop(\"scrap\"); }").unwrap();
    assert_eq!(
        p.parse().unwrap(),
        "sub Roll(int n = 1) {\n\tbonus(2);\n\tdrop(\"scrap\");\n}"
    );
}

#[test]
fn untouched_sub_declarations_are_carried_over_in_target_order() {
    let mut p = Parser::new();
    p.set_diff("scripts/loot.loot\nsub Second(int n = 2)[redefine] { drop(\"b2\"); }").unwrap();
    p.set_target("sub First(int n = 1) { drop(\"a\"); }\nsub Second(int n = 2) { drop(\"b\"); }").unwrap();
    assert_eq!(
        p.parse().unwrap(),
        "sub First(int n = 1) {\n\tdrop(\"a\");\n}\nsub Second(int n = 2) {\n\tdrop(\"b2\");\n}"
    );
}

#[test]
fn insert_attribute_is_forbidden_on_a_sub_declaration() {
    let mut p = Parser::new();
    let err = p.set_diff("scripts/loot.loot\nsub Extra(int n = 1)[insert] { drop(\"x\"); }");
    assert!(err.is_err());
}

#[test]
fn a_loot_file_with_no_sub_declaration_is_rejected() {
    let mut cache = StringCache::new();
    let err = builder::build_tree(FileType::Loot, "", false, 1, &mut cache);
    assert!(err.is_err());
}
