//! Property tests for the CSV reader.

use lagdiff_ingest::read_csv_bytes;
use proptest::prelude::*;

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z0-9]{1,6}"]
}

proptest! {
    #[test]
    fn every_row_matches_header_width(
        width in 1usize..5,
        rows in prop::collection::vec(prop::collection::vec(cell(), 0..7), 0..12),
    ) {
        let header: Vec<String> = (0..width).map(|idx| format!("c{idx}")).collect();
        let mut text = header.join(",");
        text.push('\n');
        for row in &rows {
            text.push_str(&row.join(","));
            text.push('\n');
        }

        let table = read_csv_bytes(text.as_bytes(), "generated.csv").expect("read csv");
        prop_assert_eq!(&table.headers, &header);
        for row in &table.rows {
            prop_assert_eq!(row.len(), width);
        }
        let non_blank = rows
            .iter()
            .filter(|row| row.iter().any(|value| !value.is_empty()))
            .count();
        prop_assert_eq!(table.rows.len(), non_blank);
    }
}
