use msgseries_core::{FieldPath, MemorySeriesStore, SeriesStore, Value};

#[test]
fn root_path_drops_surrounding_slashes() {
    assert_eq!(FieldPath::root("/robot/imu/").as_str(), "robot/imu");
    assert_eq!(FieldPath::root("//a//b").as_str(), "a/b");
    assert!(FieldPath::root("/").is_root());
}

#[test]
fn child_segments_are_never_empty() {
    let root = FieldPath::root("");
    assert_eq!(root.child("x").as_str(), "x");
    assert_eq!(root.child("x").child("").as_str(), "x/_");
    assert_eq!(root.child("/base_link/").as_str(), "base_link");
    assert_eq!(root.child("a").index(3).as_str(), "a/3");
    assert!(root.child("a").child("/").segments().all(|s| !s.is_empty()));
}

#[test]
fn named_element_falls_back_to_index() {
    let joints = FieldPath::root("/joint_states");
    assert_eq!(joints.named_element("elbow", 0).as_str(), "joint_states/elbow");
    assert_eq!(joints.named_element("", 2).as_str(), "joint_states/2");
    assert_eq!(joints.named_element("/", 1).as_str(), "joint_states/1");
}

#[test]
fn store_reuses_series_for_same_path() {
    let mut store = MemorySeriesStore::new();
    let path = FieldPath::root("/imu").child("x");
    let a = store.get_or_create(&path);
    let b = store.get_or_create(&path);
    assert_eq!(a, b);

    store.append(a, 1.0, 10.0);
    store.append(b, 2.0, 20.0);

    let series = store.get("imu/x").expect("series exists");
    assert_eq!(series.points(), &[(1.0, 10.0), (2.0, 20.0)]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.point_count(), 2);
}

#[test]
fn merge_appends_to_existing_series() {
    let mut left = MemorySeriesStore::new();
    let h = left.get_or_create(&FieldPath::root("a"));
    left.append(h, 0.0, 1.0);

    let mut right = MemorySeriesStore::new();
    let h = right.get_or_create(&FieldPath::root("b"));
    right.append(h, 0.0, 2.0);
    let h = right.get_or_create(&FieldPath::root("a"));
    right.append(h, 1.0, 3.0);

    left.merge(right);

    assert_eq!(left.paths().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(left.get("a").map(|s| s.len()), Some(2));
}

#[test]
fn numeric_values_convert_to_f64() {
    assert_eq!(Value::Bool(true).as_f64(), Some(1.0));
    assert_eq!(Value::I16(-4).as_f64(), Some(-4.0));
    assert_eq!(Value::U64(7).as_f64(), Some(7.0));
    assert_eq!(Value::string("x").as_f64(), None);
    assert!(Value::F32(1.0).try_str().is_err());
    assert_eq!(Value::U32(5).try_usize(), Ok(5));
    assert!(Value::I32(-1).try_usize().is_err());
}
