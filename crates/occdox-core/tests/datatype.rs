use occdox_core::DataType;

#[test]
fn array_prefixes_element_name() {
    let ty = DataType::array(DataType::scalar("INT"));
    assert_eq!(ty.name(), "[]INT");
}

#[test]
fn nesting_depth_matches_prefix_count() {
    let mut ty = DataType::scalar("INT");
    for depth in 1..=4 {
        ty = DataType::array(ty);
        assert_eq!(ty.name(), format!("{}INT", "[]".repeat(depth)));
    }
}

#[test]
fn two_dimensional_round_trip() {
    let ty = DataType::array(DataType::array(DataType::scalar("BYTE")));
    assert_eq!(ty.name(), "[][]BYTE");
    assert_eq!(DataType::from_decl("[][]BYTE"), ty);
}

#[test]
fn from_decl_trims_whitespace() {
    assert_eq!(DataType::from_decl("  INT "), DataType::scalar("INT"));
    assert_eq!(
        DataType::from_decl(" []REAL32"),
        DataType::array(DataType::scalar("REAL32"))
    );
}

#[test]
fn element_walks_one_dimension() {
    let ty = DataType::array(DataType::array(DataType::scalar("BYTE")));
    let element = ty.element().expect("element");
    assert_eq!(element.name(), "[]BYTE");
    assert!(DataType::scalar("BYTE").element().is_none());
}

#[test]
fn clone_is_structurally_independent() {
    let original = DataType::array(DataType::scalar("INT"));
    let mut copy = original.clone();
    assert_eq!(copy.name(), original.name());

    if let DataType::Array(element) = &mut copy {
        *element = Box::new(DataType::scalar("BYTE"));
    }
    assert_eq!(copy.name(), "[]BYTE");
    assert_eq!(original.name(), "[]INT");
}
