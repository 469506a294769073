use std::fs;

use text_stream_sort::order::Order;
use text_stream_sort::sort::Sort;

mod common;

#[test]
fn test_sort_by_numeric_field() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &["b 2", "a 10", "a 2"])?;

    let mut sort = Sort::new();
    sort.with_input(input_path.clone());
    sort.with_key_field(2);
    sort.with_numeric(true);
    let mut output = Vec::new();
    sort.sort_into(&mut output)?;

    // "a 2" and "b 2" tie at key 2 and are broken by full-line order
    assert_eq!(String::from_utf8(output)?, "a 2\nb 2\na 10\n");
    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_numeric_records_precede_unparseable_ones() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &["5", "abc", "3"])?;

    let mut sort = Sort::new();
    sort.with_input(input_path.clone());
    sort.with_numeric(true);
    let mut output = Vec::new();
    sort.sort_into(&mut output)?;

    assert_eq!(String::from_utf8(output)?, "3\n5\nabc\n");
    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_reverse_inverts_numeric_grouping() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &["5", "abc", "3"])?;

    let mut sort = Sort::new();
    sort.with_input(input_path.clone());
    sort.with_numeric(true);
    sort.with_order(Order::Desc);
    let mut output = Vec::new();
    sort.sort_into(&mut output)?;

    assert_eq!(String::from_utf8(output)?, "abc\n5\n3\n");
    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_lines_with_missing_field_get_empty_key() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &["x y", "solo", "a b"])?;

    let mut sort = Sort::new();
    sort.with_input(input_path.clone());
    sort.with_key_field(2);
    let mut output = Vec::new();
    sort.sort_into(&mut output)?;

    // the empty key sorts before "b" and "y"
    assert_eq!(String::from_utf8(output)?, "solo\na b\nx y\n");
    fs::remove_file(input_path)?;
    Ok(())
}

#[test]
fn test_fields_split_on_runs_of_whitespace() -> Result<(), anyhow::Error> {
    common::setup();
    let input_path = common::temp_file_name("./target/results/");
    common::write_lines(&input_path, &["a\t\t 30", "b  20", "c 10"])?;

    let mut sort = Sort::new();
    sort.with_input(input_path.clone());
    sort.with_key_field(2);
    sort.with_numeric(true);
    let mut output = Vec::new();
    sort.sort_into(&mut output)?;

    assert_eq!(String::from_utf8(output)?, "c 10\nb  20\na\t\t 30\n");
    fs::remove_file(input_path)?;
    Ok(())
}
