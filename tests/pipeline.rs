use chrono::{DateTime, TimeZone, Utc};
use jsonframer::{
    get_root_data, to_frame, to_frames, ColumnSelector, ColumnType, FieldType, FieldValues, FrameFormat,
    FramerError, FramerOptions, TimeSeriesType,
};
use serde_json::json;

const USERS: &str = r#"[
    { "username": "foo", "age": 1, "height" : 123,  "isPremium": true, "hobbies": ["reading","swimming"] },
    { "username": "bar", "age": 2, "height" : 123.45,  "isPremium": false, "hobbies": ["reading","swimming"], "occupation": "student" }
]"#;

const SSS: &str = r#"{
    "sss": [
        { "foo" : "1.2", "bar1": 4, "baz" : true },
        { "foo" : "3", "bar1": 5.6, "baz" : false }
    ]
}"#;

const DATES: &str = r#"[
    { "foo" : "2011-01-01T00:00:00.000Z", "bar1": 1325376000000, "baz" : true },
    { "foo" : "2012-01-01T00:00:00.000Z", "bar1": 1356998400000, "baz" : false }
]"#;

fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn strings(values: &[&str]) -> FieldValues {
    FieldValues::String(values.iter().map(|v| Some(v.to_string())).collect())
}

fn numbers(values: &[f64]) -> FieldValues {
    FieldValues::Number(values.iter().copied().map(Some).collect())
}

#[test]
fn test_invalid_input() {
    let options = FramerOptions::default();
    assert!(matches!(to_frame("", &options), Err(FramerError::InvalidInput(_))));
    assert!(matches!(to_frame("   ", &options), Err(FramerError::InvalidInput(_))));
    assert!(matches!(to_frame("{", &options), Err(FramerError::InvalidInput(_))));
    assert!(matches!(to_frames("{", &options), Err(FramerError::InvalidInput(_))));

    for json in ["{}", "[]"] {
        assert_eq!(to_frame(json, &options).unwrap().row_count(), 0);
    }
}

#[test]
fn test_primitive_arrays() {
    let options = FramerOptions::default();
    let frame = to_frame(r#"["foo", "bar"]"#, &options).unwrap();
    assert_eq!(frame.field_names(), vec!["value"]);
    assert_eq!(frame.fields()[0].values, strings(&["foo", "bar"]));

    let frame = to_frame("[123, 123.45]", &options).unwrap();
    assert_eq!(frame.fields()[0].values, numbers(&[123.0, 123.45]));
}

#[test]
fn test_object_keeps_every_key() {
    let frame = to_frame(
        r#"{ "username": "foo", "age": 1, "height" : 123.45,  "isPremium": true, "hobbies": ["reading","swimming"] }"#,
        &FramerOptions::default(),
    )
    .unwrap();
    assert_eq!(frame.row_count(), 1);
    assert_eq!(frame.field_names(), vec!["username", "age", "height", "isPremium", "hobbies"]);
    let types: Vec<FieldType> = frame.fields().iter().map(|f| f.field_type()).collect();
    assert_eq!(
        types,
        vec![FieldType::String, FieldType::Number, FieldType::Number, FieldType::Boolean, FieldType::Json]
    );
    assert_eq!(
        frame.field("hobbies").unwrap().values,
        FieldValues::Json(vec![Some(json!(["reading", "swimming"]))])
    );
}

#[test]
fn test_rows_union_keys() {
    let frame = to_frame(USERS, &FramerOptions::default()).unwrap();
    assert_eq!(frame.row_count(), 2);
    assert_eq!(
        frame.field_names(),
        vec!["username", "age", "height", "isPremium", "hobbies", "occupation"]
    );
    assert_eq!(frame.field("height").unwrap().values, numbers(&[123.0, 123.45]));
    assert_eq!(
        frame.field("occupation").unwrap().values,
        FieldValues::String(vec![None, Some("student".into())])
    );
}

#[test]
fn test_root_selector() {
    let doc = format!(r#"{{ "meta": {{}}, "data": {} }}"#, USERS);

    let without_root = to_frame(&doc, &FramerOptions::default()).unwrap();
    assert_eq!(without_root.field_names(), vec!["meta", "data"]);
    assert_eq!(without_root.row_count(), 1);

    let with_root = to_frame(&doc, &FramerOptions::default().with_root_selector("data")).unwrap();
    assert_eq!(with_root, to_frame(USERS, &FramerOptions::default()).unwrap());
}

#[test]
fn test_column_alias() {
    let options = FramerOptions::default()
        .with_root_selector("data")
        .with_column(ColumnSelector::new("username").with_alias("user-name"))
        .with_column(ColumnSelector::new("occupation"));

    let doc = format!(r#"{{ "meta": {{}}, "data": {} }}"#, USERS);
    let frame = to_frame(&doc, &options).unwrap();
    assert_eq!(frame.field_names(), vec!["user-name", "occupation"]);
    assert!(frame.field("username").is_none());
    assert_eq!(frame.field("user-name").unwrap().values, strings(&["foo", "bar"]));

    let single = r#"{ "meta" : {}, "data" : { "username": "bar", "age": 2, "occupation": "student" } }"#;
    let frame = to_frame(single, &options).unwrap();
    assert_eq!(frame.row_count(), 1);
    assert_eq!(frame.field("user-name").unwrap().values, strings(&["bar"]));
    assert_eq!(frame.field("occupation").unwrap().values, strings(&["student"]));
}

#[test]
fn test_column_subset() {
    let options = FramerOptions::default()
        .with_column(ColumnSelector::new("age"))
        .with_column(ColumnSelector::new("occupation"));
    let frame = to_frame(USERS, &options).unwrap();
    assert_eq!(frame.field_names(), vec!["age", "occupation"]);
    assert_eq!(frame.field("age").unwrap().values, numbers(&[1.0, 2.0]));
}

#[test]
fn test_scalar_root_with_columns_has_no_rows() {
    let options = FramerOptions::default().with_column(ColumnSelector::new("a"));
    for doc in ["5", r#""text""#, "true", "null", r#"{"n": 5}"#] {
        let root = if doc.starts_with('{') { "n" } else { "" };
        let frame = to_frame(doc, &options.clone().with_root_selector(root)).unwrap();
        assert_eq!(frame.field_names(), vec!["a"], "{}", doc);
        assert_eq!(frame.row_count(), 0, "{}", doc);
    }

    let frame = to_frame(r#"{"a": 1}"#, &options).unwrap();
    assert_eq!(frame.row_count(), 1);
}

#[test]
fn test_string_columns() {
    let options = FramerOptions::default()
        .with_root_selector("sss")
        .with_column(ColumnSelector::new("foo").with_type(ColumnType::String))
        .with_column(ColumnSelector::new("bar1").with_alias("bar").with_type(ColumnType::String))
        .with_column(ColumnSelector::new("baz").with_type(ColumnType::String));
    let frame = to_frame(SSS, &options).unwrap();
    assert_eq!(frame.field("foo").unwrap().values, strings(&["1.2", "3"]));
    assert_eq!(frame.field("bar").unwrap().values, strings(&["4", "5.6"]));
    assert_eq!(frame.field("baz").unwrap().values, strings(&["true", "false"]));
}

#[test]
fn test_number_columns() {
    let options = FramerOptions::default()
        .with_root_selector("sss")
        .with_column(ColumnSelector::new("foo").with_type(ColumnType::Number))
        .with_column(ColumnSelector::new("bar1").with_alias("bar").with_type(ColumnType::Number))
        .with_column(ColumnSelector::new("baz").with_type(ColumnType::Number));
    let frame = to_frame(SSS, &options).unwrap();
    assert_eq!(frame.field("foo").unwrap().values, numbers(&[1.2, 3.0]));
    assert_eq!(frame.field("bar").unwrap().values, numbers(&[4.0, 5.6]));
    assert_eq!(frame.field("baz").unwrap().values, numbers(&[1.0, 0.0]));
}

#[test]
fn test_timestamp_columns() {
    let options = FramerOptions::default()
        .with_column(ColumnSelector::new("foo").with_type(ColumnType::Timestamp))
        .with_column(ColumnSelector::new("bar1").with_alias("bar").with_type(ColumnType::Timestamp))
        .with_column(ColumnSelector::new("baz").with_type(ColumnType::Timestamp));
    let frame = to_frame(DATES, &options).unwrap();
    assert_eq!(
        frame.field("foo").unwrap().values,
        FieldValues::Time(vec![Some(utc(2011, 1, 1)), Some(utc(2012, 1, 1))])
    );
    assert_eq!(
        frame.field("bar").unwrap().values,
        FieldValues::Time(vec![Some(utc(2012, 1, 1)), Some(utc(2013, 1, 1))])
    );
    assert_eq!(frame.field("baz").unwrap().values, FieldValues::Time(vec![None, None]));
}

#[test]
fn test_epoch_columns() {
    let epoch_ms = r#"{
        "sss": [
            { "foo" : "1262304000000", "bar1": 1325376000000, "baz" : true },
            { "foo" : "1293840000000", "bar1": 1356998400000, "baz" : false }
        ]
    }"#;
    let options = FramerOptions::default()
        .with_root_selector("sss")
        .with_column("foo:timestamp_epoch".parse().unwrap())
        .with_column("bar1:timestamp_epoch:bar".parse().unwrap());
    let frame = to_frame(epoch_ms, &options).unwrap();
    assert_eq!(
        frame.field("foo").unwrap().values,
        FieldValues::Time(vec![Some(utc(2010, 1, 1)), Some(utc(2011, 1, 1))])
    );
    assert_eq!(
        frame.field("bar").unwrap().values,
        FieldValues::Time(vec![Some(utc(2012, 1, 1)), Some(utc(2013, 1, 1))])
    );

    let epoch_s = r#"[
        { "foo" : "1262304000", "bar1": 1325376000 },
        { "foo" : "1293840000", "bar1": 1356998400 }
    ]"#;
    let options = FramerOptions::default()
        .with_column(ColumnSelector::new("foo").with_type(ColumnType::TimestampEpochS))
        .with_column(ColumnSelector::new("bar1").with_type(ColumnType::TimestampEpochS));
    let frame = to_frame(epoch_s, &options).unwrap();
    assert_eq!(
        frame.field("foo").unwrap().values,
        FieldValues::Time(vec![Some(utc(2010, 1, 1)), Some(utc(2011, 1, 1))])
    );
    assert_eq!(
        frame.field("bar1").unwrap().values,
        FieldValues::Time(vec![Some(utc(2012, 1, 1)), Some(utc(2013, 1, 1))])
    );
}

#[test]
fn test_epoch_units_are_not_interchangeable() {
    let options = FramerOptions::default()
        .with_column(ColumnSelector::new("t").with_alias("ms").with_type(ColumnType::TimestampEpochMs))
        .with_column(ColumnSelector::new("t").with_alias("s").with_type(ColumnType::TimestampEpochS));
    let frame = to_frame(r#"{"t": "1325376000000"}"#, &options).unwrap();
    assert_eq!(frame.field("ms").unwrap().values, FieldValues::Time(vec![Some(utc(2012, 1, 1))]));
    assert_eq!(frame.field("s").unwrap().values, FieldValues::Time(vec![Some(utc(43969, 6, 30))]));
}

#[test]
fn test_expression_root_selectors() {
    let options = FramerOptions::default().with_root_selector("sss.foo");
    let frame = to_frame(SSS, &options).unwrap();
    assert_eq!(frame.fields()[0].values, strings(&["1.2", "3"]));

    let options = FramerOptions::default().with_root_selector("sss.bar1");
    let frame = to_frame(SSS, &options).unwrap();
    assert_eq!(frame.fields()[0].values, numbers(&[4.0, 5.6]));

    let options = FramerOptions::default().with_root_selector("$sum(sss.bar1)");
    let frame = to_frame(SSS, &options).unwrap();
    assert_eq!(frame.row_count(), 1);
    assert_eq!(frame.fields()[0].values, numbers(&[9.6]));

    assert_eq!(get_root_data(SSS, "$sum(sss.bar1)").unwrap(), "9.6");
    assert_eq!(get_root_data(SSS, "sss.foo").unwrap(), r#"["1.2","3"]"#);
}

#[test]
fn test_map_in_root_selector() {
    let doc = r#"{
        "inputs" : [
            { "a" : 1, "b" : {"c": 11}, "tag": "x" },
            { "a" : 2, "b": {"c": 22}, "tag": "y" }
        ]
    }"#;
    let selector = r#"$map(inputs,function($v){{
        "a": $v.a,
        "c": $v.b.c,
        "label": $uppercase($v.tag)
    }})"#;
    let frame = to_frame(doc, &FramerOptions::default().with_root_selector(selector)).unwrap();
    assert_eq!(frame.field_names(), vec!["a", "c", "label"]);
    assert_eq!(frame.field("a").unwrap().values, numbers(&[1.0, 2.0]));
    assert_eq!(frame.field("c").unwrap().values, numbers(&[11.0, 22.0]));
    assert_eq!(frame.field("label").unwrap().values, strings(&["X", "Y"]));
}

#[test]
fn test_deeply_nested_input_is_rejected() {
    let deep = format!(r#"{{"s": {}1{}}}"#, "[".repeat(200), "]".repeat(200));
    assert!(matches!(get_root_data(&deep, "$count(s)"), Err(FramerError::InvalidInput(_))));

    let selector = "(".repeat(100_000);
    assert!(matches!(
        get_root_data(SSS, &selector),
        Err(FramerError::RootSelectorCompile { .. })
    ));
}

#[test]
fn test_root_selector_errors() {
    let options = FramerOptions::default().with_root_selector("sss[");
    assert!(matches!(
        to_frame(SSS, &options),
        Err(FramerError::RootSelectorCompile { .. })
    ));
    let options = FramerOptions::default().with_root_selector("sss.foo + 1");
    assert!(matches!(to_frames(SSS, &options), Err(FramerError::RootSelectorEval { .. })));
}

#[test]
fn test_timestamp_override() {
    let before = to_frame(DATES, &FramerOptions::default()).unwrap();
    let options = FramerOptions::default().with_override(ColumnSelector::new("foo").with_type(ColumnType::Timestamp));
    let after = to_frame(DATES, &options).unwrap();

    assert_eq!(before.field("foo").unwrap().field_type(), FieldType::String);
    assert_eq!(
        after.field("foo").unwrap().values,
        FieldValues::Time(vec![Some(utc(2011, 1, 1)), Some(utc(2012, 1, 1))])
    );
    assert_eq!(after.row_count(), before.row_count());
    assert_eq!(after.field_names(), before.field_names());
    assert_eq!(after.field("bar1"), before.field("bar1"));
    assert_eq!(after.field("baz"), before.field("baz"));
}

#[test]
fn test_time_column_overrides() {
    let base = FramerOptions::default().with_column(ColumnSelector::new("foo").with_type(ColumnType::Timestamp));

    let options = base.clone().with_override(ColumnSelector::new("foo").with_type(ColumnType::String));
    let frame = to_frame(DATES, &options).unwrap();
    assert_eq!(frame.field("foo").unwrap().values, strings(&["2011-01-01T00:00:00Z", "2012-01-01T00:00:00Z"]));

    let options = base.with_override(ColumnSelector::new("foo").with_type(ColumnType::TimestampEpochS));
    let frame = to_frame(DATES, &options).unwrap();
    assert_eq!(
        frame.field("foo").unwrap().values,
        FieldValues::Time(vec![Some(utc(2011, 1, 1)), Some(utc(2012, 1, 1))])
    );
}

#[test]
fn test_field_overrides() {
    let doc = r#"[
        { "foo" : "2011-01-01T00:00:00.000Z", "bar1": 1325376000000, "baz" : true },
        { "foo" : "2012-01-01T00:00:00.000Z", "bar1": 1356998400000, "baz" : false , "num": 12, "bool": false, "str": "hello", "nullf": null }
    ]"#;
    let options = FramerOptions::default()
        .with_override("foo:timestamp".parse().unwrap())
        .with_override("bar1:string".parse().unwrap())
        .with_override("baz:string".parse().unwrap());
    let before = to_frame(doc, &FramerOptions::default()).unwrap();
    let frame = to_frame(doc, &options).unwrap();

    assert_eq!(frame.field_names(), vec!["foo", "bar1", "baz", "num", "bool", "str", "nullf"]);
    assert_eq!(frame.field("foo").unwrap().field_type(), FieldType::Time);
    assert_eq!(frame.field("bar1").unwrap().values, strings(&["1325376000000", "1356998400000"]));
    assert_eq!(frame.field("baz").unwrap().values, strings(&["true", "false"]));
    for untouched in ["num", "bool", "str", "nullf"] {
        assert_eq!(frame.field(untouched), before.field(untouched));
    }
    assert_eq!(frame.field("nullf").unwrap().values, FieldValues::Json(vec![None, None]));
}

#[test]
fn test_multi_frame_shapes() {
    let options = FramerOptions::default();

    let frames = to_frames(
        r#"[
            [ {"name": "foo", "age": 2}, {"name": "bar", "age": 3} ],
            [ {"name": "foo", "salary": 2430 }, {"name": "foo", "salary": 3000 } ]
        ]"#,
        &options,
    )
    .unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].field_names(), vec!["name", "age"]);
    assert_eq!(frames[1].field_names(), vec!["name", "salary"]);

    let frames = to_frames(r#"[[{"a":1}],[{"a":2}]]"#, &options).unwrap();
    assert_eq!(frames.len(), 2);
    assert!(frames.iter().all(|f| f.row_count() == 1));

    let frames = to_frames(r#"[{"a":1},{"a":2}]"#, &options).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].row_count(), 2);

    let frames = to_frames(r#"["x","y"]"#, &FramerOptions::new("result")).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].name(), "result");
    assert_eq!(frames[0].row_count(), 2);

    let frames = to_frames(r#"[[{"a":1}], {"a":2}]"#, &options).unwrap();
    assert_eq!(frames.len(), 1);

    let frames = to_frames(r#"{"name": "foo", "age": 2, "salary": 2430}"#, &options).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].row_count(), 1);
    assert_eq!(frames[0].column_count(), 3);

    let frames = to_frames("[]", &options).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].row_count(), 0);
}

#[test]
fn test_to_frame_does_not_split() {
    let frame = to_frame(r#"[[1, "a"], [2, "b"]]"#, &FramerOptions::default()).unwrap();
    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.field_names(), vec!["0", "1"]);
}

#[test]
fn test_azure_cost_rows() {
    let doc = r#"{
        "id": "subscriptions/xxx/providers/Microsoft.CostManagement/query/yyy",
        "properties": {
            "nextLink": null,
            "columns": [
                {"name": "Cost", "type": "Number"},
                {"name": "CostUSD", "type": "Number"},
                {"name": "UsageDate", "type": "Number"},
                {"name": "Currency", "type": "String"}
            ],
            "rows": [
                [0.0247, 0.0247, 20220501, "USD"],
                [1.5, 1.5, 20220502, "USD"],
                [2.25, 2.25, 20220503, "USD"]
            ]
        }
    }"#;
    let options = FramerOptions::default()
        .with_root_selector("properties.rows")
        .with_column(ColumnSelector::new("0").with_type(ColumnType::Number))
        .with_column(ColumnSelector::new("1").with_type(ColumnType::Number))
        .with_column(ColumnSelector::new("2").with_type(ColumnType::Timestamp).with_time_format("20060102"))
        .with_column(ColumnSelector::new("3"));

    let frame = to_frame(doc, &options).unwrap();
    assert_eq!(frame.field_names(), vec!["0", "1", "2", "3"]);
    assert_eq!(frame.field("0").unwrap().values, numbers(&[0.0247, 1.5, 2.25]));
    assert_eq!(
        frame.field("2").unwrap().values,
        FieldValues::Time(vec![Some(utc(2022, 5, 1)), Some(utc(2022, 5, 2)), Some(utc(2022, 5, 3))])
    );
    assert_eq!(frame.field("3").unwrap().values, strings(&["USD", "USD", "USD"]));
    assert_eq!(frame.time_series_type(), TimeSeriesType::Long);
}

const DNS_SELECTOR: &str = r#"$map($.result.query.metrics,function($metric_name,$metric_name_index){
    $map($.result.data,function($data,$data_index){
        $map($.result.time_intervals, function($time, $time_index){
            $merge([
                { 'time': $time[0] },
                { $metric_name: ($data.metrics[$metric_name_index])[$time_index]},
                $map($.result.query.dimensions, function($dname, $dname_index){{$dname: $data.dimensions[$dname_index]}})
            ])
        })
    })
}).$"#;

fn dns_analytics(dimensions: bool) -> String {
    let (query_dimensions, a, b) = if dimensions {
        (r#"["queryName"]"#, r#"["a.example.com"]"#, r#"["b.example.com"]"#)
    } else {
        ("[]", "[]", "[]")
    };
    format!(
        r#"{{
            "success": true,
            "result": {{
                "query": {{ "metrics": ["queryCount", "uncachedCount"], "dimensions": {query_dimensions} }},
                "time_intervals": [
                    ["2022-05-01T00:00:00Z", "2022-05-01T00:59:59Z"],
                    ["2022-05-01T01:00:00Z", "2022-05-01T01:59:59Z"]
                ],
                "data": [
                    {{ "dimensions": {a}, "metrics": [[1, 2], [0, 1]] }},
                    {{ "dimensions": {b}, "metrics": [[3, 4], [1, 1]] }}
                ]
            }}
        }}"#
    )
}

fn dns_options() -> FramerOptions {
    FramerOptions::default()
        .with_root_selector(DNS_SELECTOR)
        .with_override(ColumnSelector::new("time").with_type(ColumnType::Timestamp))
        .with_format(FrameFormat::TimeSeries)
}

#[test]
fn test_cloudflare_long_series_to_wide() {
    let frames = to_frames(&dns_analytics(true), &dns_options()).unwrap();
    assert_eq!(frames.len(), 4);

    let times = FieldValues::Time(vec![
        Some(Utc.with_ymd_and_hms(2022, 5, 1, 0, 0, 0).unwrap()),
        Some(Utc.with_ymd_and_hms(2022, 5, 1, 1, 0, 0).unwrap()),
    ]);
    let expected = [
        ("queryCount {queryName=\"a.example.com\"}", [1.0, 2.0]),
        ("queryCount {queryName=\"b.example.com\"}", [3.0, 4.0]),
        ("uncachedCount {queryName=\"a.example.com\"}", [0.0, 1.0]),
        ("uncachedCount {queryName=\"b.example.com\"}", [1.0, 1.0]),
    ];
    for (frame, (name, values)) in frames.iter().zip(expected) {
        assert_eq!(frame.time_series_type(), TimeSeriesType::Wide);
        assert_eq!(frame.column_count(), 2);
        assert_eq!(frame.fields()[0].values, times);
        assert_eq!(frame.fields()[1].display_name(), name);
        assert_eq!(frame.fields()[1].values, numbers(&values));
    }
}

#[test]
fn test_cloudflare_without_dimensions() {
    let frames = to_frames(&dns_analytics(false), &dns_options()).unwrap();
    assert_eq!(frames.len(), 4);
    for frame in &frames {
        assert_eq!(frame.time_series_type(), TimeSeriesType::Wide);
        assert_eq!(frame.fields()[0].field_type(), FieldType::Time);
        assert!(frame.fields()[1].labels.is_empty());
    }
    assert_eq!(frames[0].field_names(), vec!["time", "queryCount"]);
    assert_eq!(frames[3].field_names(), vec!["time", "uncachedCount"]);
}

#[test]
fn test_strict_mode() {
    let options = FramerOptions::default()
        .with_root_selector("sss")
        .with_column(ColumnSelector::new("foo").with_type(ColumnType::Boolean));

    let frame = to_frame(SSS, &options).unwrap();
    assert_eq!(frame.field("foo").unwrap().values, FieldValues::Boolean(vec![None, None]));

    match to_frame(SSS, &options.clone().strict()) {
        Err(FramerError::Coercion { column, target, .. }) => {
            assert_eq!(column, "foo");
            assert_eq!(target, "boolean");
        }
        other => panic!("expected coercion error, got {:?}", other),
    }
}

#[test]
fn test_nested_value_in_declared_column() {
    let options = FramerOptions::default().with_column(ColumnSelector::new("hobbies").with_type(ColumnType::String));
    assert!(matches!(to_frame(USERS, &options), Err(FramerError::FrameBuild(_))));
}

#[test]
fn test_deterministic_output() {
    let options = dns_options();
    let doc = dns_analytics(true);
    let first = serde_json::to_string(&to_frames(&doc, &options).unwrap()).unwrap();
    let second = serde_json::to_string(&to_frames(&doc, &options).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_frame_json_shape() {
    let options = FramerOptions::new("A")
        .with_column(ColumnSelector::new("foo").with_type(ColumnType::Timestamp))
        .with_column(ColumnSelector::new("bar1").with_alias("bar"));
    let frame = to_frame(DATES, &options).unwrap();
    assert_eq!(
        serde_json::to_value(&frame).unwrap(),
        json!({
            "name": "A",
            "fields": [
                {"name": "foo", "type": "time", "values": ["2011-01-01T00:00:00Z", "2012-01-01T00:00:00Z"]},
                {"name": "bar", "type": "number", "values": [1325376000000.0, 1356998400000.0]}
            ]
        })
    );
}

#[test]
fn test_options_from_json() {
    let options: FramerOptions = serde_json::from_value(json!({
        "root_selector": "sss",
        "columns": [{"selector": "bar1", "alias": "bar", "type": "number"}],
        "frame_format": "timeseries"
    }))
    .unwrap();
    assert_eq!(options.frame_format, FrameFormat::TimeSeries);
    let frame = to_frame(SSS, &options).unwrap();
    assert_eq!(frame.field("bar").unwrap().values, numbers(&[4.0, 5.6]));
}
