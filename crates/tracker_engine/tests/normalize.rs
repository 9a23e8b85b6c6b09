use pretty_assertions::assert_eq;
use tracker_core::CatalogItem;
use tracker_engine::{
    load_catalog, normalize_table, resolve_columns, LogicalColumn, RawTable, SourceFormat,
    UploadError,
};

fn urls(csv: &str) -> Vec<String> {
    load_catalog(csv.as_bytes(), "plan.csv")
        .unwrap()
        .items()
        .iter()
        .map(|item| item.url.clone())
        .collect()
}

#[test]
fn scenario_rows_keep_empty_titles() {
    let csv = "Subject,Topic,ItemTitle,ItemURL\n\
               Math,Algebra,Lesson 1,u1\n\
               Math,Algebra,,u2\n\
               Sci,Bio,Cell,u3\n";
    let catalog = load_catalog(csv.as_bytes(), "plan.csv").unwrap();
    assert_eq!(
        catalog.items(),
        &[
            CatalogItem::new("Math", "Algebra", "Lesson 1", "u1"),
            CatalogItem::new("Math", "Algebra", "", "u2"),
            CatalogItem::new("Sci", "Bio", "Cell", "u3"),
        ]
    );
    assert_eq!(catalog.items()[1].display_title(), "Content");
}

#[test]
fn header_case_does_not_matter() {
    for header in ["itemurl", "ItemURL", "ITEMURL", " ItemUrl "] {
        let csv = format!("subject,{header}\nMath,u1\n");
        let catalog = load_catalog(csv.as_bytes(), "plan.csv").unwrap();
        assert_eq!(catalog.len(), 1, "header {header:?}");
        assert_eq!(catalog.items()[0].subject, "Math");
        assert_eq!(catalog.items()[0].url, "u1");
    }
}

#[test]
fn blank_and_missing_urls_are_dropped_in_order() {
    let csv = "Subject,ItemURL\nA,u1\nB,   \nC,\nD,NA\nE, u5 \n";
    assert_eq!(urls(csv), vec!["u1", "u5"]);
}

#[test]
fn values_are_trimmed_and_nulls_become_empty() {
    let csv = "Subject,Topic,ItemTitle,ItemURL,GradeURL,TopicURL\n  Math ,null,  Intro  , u1 ,g,t\n";
    let catalog = load_catalog(csv.as_bytes(), "plan.csv").unwrap();
    let item = &catalog.items()[0];
    assert_eq!(item.subject, "Math");
    assert_eq!(item.topic, "");
    assert_eq!(item.title, "Intro");
    assert_eq!(item.url, "u1");
    assert_eq!(item.grade_url, "g");
    assert_eq!(item.topic_url, "t");
}

#[test]
fn missing_columns_are_synthesized_empty() {
    let catalog = load_catalog(b"ItemURL\nu1\n", "plan.csv").unwrap();
    assert_eq!(catalog.items(), &[CatalogItem::new("", "", "", "u1")]);
}

#[test]
fn no_url_column_yields_empty_catalog() {
    let catalog = load_catalog(b"Subject,Topic\nMath,Algebra\n", "plan.csv").unwrap();
    assert!(catalog.is_empty());
}

#[test]
fn duplicate_urls_are_kept_as_separate_rows() {
    let csv = "ItemTitle,ItemURL\nFirst,dup\nSecond,dup\n";
    let catalog = load_catalog(csv.as_bytes(), "plan.csv").unwrap();
    let titles: Vec<&str> = catalog.items().iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[test]
fn quoted_fields_and_non_ascii_survive() {
    let csv = "Subject,ItemTitle,ItemURL\n\"Türkçe\",\"Kesirler, giriş\",https://ö.example/ğ\n";
    let catalog = load_catalog(csv.as_bytes(), "ders.csv").unwrap();
    assert_eq!(catalog.items()[0].subject, "Türkçe");
    assert_eq!(catalog.items()[0].title, "Kesirler, giriş");
    assert_eq!(catalog.items()[0].url, "https://ö.example/ğ");
}

#[test]
fn unsupported_extension_is_rejected_before_parsing() {
    let err = load_catalog(b"Subject,ItemURL\nMath,u1\n", "plan.txt").unwrap_err();
    assert_eq!(
        err,
        UploadError::UnsupportedFormat {
            filename: "plan.txt".into()
        }
    );
}

#[test]
fn invalid_utf8_is_a_parse_error() {
    let err = load_catalog(b"Subject,ItemURL\nMa\xfft,u1\n", "plan.csv").unwrap_err();
    assert!(matches!(
        err,
        UploadError::Parse {
            format: SourceFormat::Csv,
            ..
        }
    ));
}

#[test]
fn ragged_csv_is_a_parse_error() {
    let err = load_catalog(b"Subject,ItemURL\nMath,u1,surplus\n", "plan.csv").unwrap_err();
    assert!(matches!(err, UploadError::Parse { .. }));
}

#[test]
fn first_matching_header_wins() {
    let headers = vec![
        "ItemURL".to_string(),
        "Other".to_string(),
        "itemurl".to_string(),
    ];
    let map = resolve_columns(&headers);
    assert_eq!(map.position(LogicalColumn::ItemUrl), Some(0));
    assert_eq!(map.position(LogicalColumn::Subject), None);
}

#[test]
fn report_counts_dropped_rows_and_missing_columns() {
    let mut table = RawTable::new(vec!["ItemURL".into(), "Subject".into()]);
    table.push_row(vec![Some("u1".into()), Some("Math".into())]);
    table.push_row(vec![None, Some("Math".into())]);
    let report = normalize_table(&table);
    assert_eq!(report.catalog.len(), 1);
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(
        report.missing_columns,
        vec![
            LogicalColumn::GradeUrl,
            LogicalColumn::Topic,
            LogicalColumn::TopicUrl,
            LogicalColumn::ItemTitle,
        ]
    );
}
