//! `INSERT` rewriting: drops statements that load a target table and strips
//! foreign-key columns referencing one from the remaining statements.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::patterns::compile;
use crate::scan::{find_keyword, matching_paren, split_top_level};
use crate::tables::{reference_column, TargetTables};

static INSERT_HEAD: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\binsert\s+into\s+(?:\w+\.)?\w+\s*\("));

/// Rewrites the `INSERT` statements in `content` for every target table.
#[must_use]
pub fn rewrite(content: &str, tables: &TargetTables) -> String {
    let mut out = content.to_string();
    for table in tables.iter() {
        out = remove_direct(&out, table);
        let ref_col = reference_column(table);
        out = super::for_each_statement(&out, |statement| {
            strip_reference_column(statement, &ref_col)
        });
    }
    out
}

/// Drops every statement that inserts directly into `table`, schema
/// qualified or not.
fn remove_direct(content: &str, table: &str) -> String {
    let pattern = compile(&format!(
        r"(?i)\binsert\s+into\s+(?:\w+\.)?{}\s*\(",
        regex::escape(table)
    ));
    super::for_each_statement(content, |statement| {
        if pattern.is_match(statement) {
            String::new()
        } else {
            statement.to_string()
        }
    })
}

/// Removes one `ref_col` column and the value at the same position in every
/// row tuple. Statements without the column pass through untouched, as do
/// statements whose shape cannot be read back safely.
fn strip_reference_column(statement: &str, ref_col: &str) -> String {
    let Some(head) = INSERT_HEAD.find(statement) else {
        return statement.to_string();
    };
    let cols_open = head.end() - 1;
    let Some(cols_close) = matching_paren(statement, cols_open) else {
        return statement.to_string();
    };
    let columns = split_top_level(&statement[cols_open + 1..cols_close], ',');
    let Some(idx) = columns
        .iter()
        .position(|col| col.trim().eq_ignore_ascii_case(ref_col))
    else {
        return statement.to_string();
    };
    let Some((values_pos, values_len)) = find_keyword(statement, cols_close, &["VALUES"]) else {
        return statement.to_string();
    };

    let trimmed_len = statement.trim_end().len();
    let has_semi = statement.trim_end().ends_with(';');
    let core_end = if has_semi { trimmed_len - 1 } else { trimmed_len };

    let mut kept_columns = columns;
    kept_columns.remove(idx);

    let mut rows = Vec::new();
    for row in split_top_level(&statement[values_pos + values_len..core_end], ',') {
        if row.starts_with('(') && row.ends_with(')') {
            let mut values = split_top_level(&row[1..row.len() - 1], ',');
            if idx < values.len() {
                values.remove(idx);
                rows.push(format!("({})", values.join(", ")));
                continue;
            }
        }
        rows.push(row);
    }

    let mut out = String::new();
    out.push_str(&statement[..=cols_open]);
    out.push_str(&kept_columns.join(", "));
    out.push_str(&statement[cols_close..values_pos + values_len]);
    out.push(' ');
    out.push_str(&rows.join(", "));
    if has_semi {
        out.push(';');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::rewrite;
    use crate::tables::TargetTables;

    fn targets(names: &[&str]) -> TargetTables {
        TargetTables::new(names.iter().copied())
    }

    #[test]
    fn direct_inserts_are_removed() {
        let sql = "insert into target (id, name) values (1, 'a');\n\n\
                   insert into product (id) values (2);";
        assert_eq!(
            rewrite(sql, &targets(&["target"])),
            "insert into product (id) values (2);"
        );
    }

    #[test]
    fn schema_qualified_direct_inserts_are_removed() {
        let sql = "INSERT INTO public.target (id) VALUES (1);";
        assert_eq!(rewrite(sql, &targets(&["target"])), "");
    }

    #[test]
    fn similar_table_names_survive() {
        let sql = "insert into target_history (id) values (1);";
        assert_eq!(rewrite(sql, &targets(&["target"])), sql);
    }

    #[test]
    fn reference_column_is_stripped_with_its_value() {
        let sql = "insert into product (id, target_id, name) values (1, 7, 'a');";
        assert_eq!(
            rewrite(sql, &targets(&["target"])),
            "insert into product (id, name) values (1, 'a');"
        );
    }

    #[test]
    fn every_row_of_a_multi_row_insert_loses_the_value() {
        let sql = "insert into product (id, target_id) values (1, 7), (2, 8), (3, 9);";
        assert_eq!(
            rewrite(sql, &targets(&["target"])),
            "insert into product (id) values (1), (2), (3);"
        );
    }

    #[test]
    fn nested_function_calls_in_values_stay_intact() {
        let sql = "insert into currency (id, name, code, num_code, created_by, \
                   created_date, last_modified_by, last_modified_date, version, recycle_bin_id) \
                   values (gen_random_uuid(), 'Тенге', 'KZT', '398', 'admin', \
                   '2022-02-22 22:22:22.000000', null, '2022-02-22 22:22:22.000000', 1, ?);";
        let out = rewrite(sql, &targets(&["recycle_bin"]));
        assert!(out.contains("(id, name, code, num_code, created_by, created_date, last_modified_by, last_modified_date, version)"));
        assert!(out.ends_with(
            "values (gen_random_uuid(), 'Тенге', 'KZT', '398', 'admin', '2022-02-22 22:22:22.000000', null, '2022-02-22 22:22:22.000000', 1);"
        ));
    }

    #[test]
    fn exact_column_match_spares_similar_columns() {
        let sql = "insert into log (id, other_target_id) values (1, 2);";
        assert_eq!(rewrite(sql, &targets(&["target"])), sql);
    }

    #[test]
    fn commas_inside_string_values_do_not_shift_positions() {
        let sql = "insert into product (id, target_id, note) values (1, 7, 'a, b');";
        assert_eq!(
            rewrite(sql, &targets(&["target"])),
            "insert into product (id, note) values (1, 'a, b');"
        );
    }

    #[test]
    fn trailing_underscore_tables_use_the_collapsed_column() {
        let sql = "insert into product (id, users_id) values (1, 2);";
        assert_eq!(
            rewrite(sql, &targets(&["users_"])),
            "insert into product (id) values (1);"
        );
    }
}
