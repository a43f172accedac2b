use std::collections::HashSet;
use std::path::Path;

const REQUIRED_COLUMNS: &[&str] = &["name", "start", "end"];

fn main() {
    let catalog_path = Path::new("data/ics2020.csv");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let text = catalog_contents
        .strip_prefix('\u{feff}')
        .unwrap_or(&catalog_contents);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut rows = reader.records().map(|row| {
        row.unwrap_or_else(|e| {
            panic!(
                "\n\nCATALOG BUILD ERROR: Invalid CSV\n\
                 Path: {}\n\
                 Error: {e}\n",
                catalog_path.display()
            );
        })
    });

    let header = rows.next().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing header line\n\
             Path: {}\n",
            catalog_path.display()
        );
    });
    let columns: Vec<String> = header.iter().map(str::to_lowercase).collect();
    let column = |name: &str| columns.iter().position(|c| c == name);

    for &required in REQUIRED_COLUMNS {
        assert!(
            column(required).is_some(),
            "\n\nCATALOG BUILD ERROR: Missing '{required}' column\n\
             Got header: {columns:?}\n"
        );
    }
    let name_column = column("name").unwrap_or_default();

    let mut names = HashSet::new();
    let mut count = 0;
    for row in rows {
        let line_number = row.position().map_or(0, csv::Position::line);
        assert!(
            row.len() <= columns.len(),
            "\n\nCATALOG BUILD ERROR: Line {line_number} has {} fields, header has {}\n",
            row.len(),
            columns.len()
        );

        let name = row.get(name_column).unwrap_or_default();
        assert!(
            !name.is_empty(),
            "\n\nCATALOG BUILD ERROR: Line {line_number} has an empty 'name'\n"
        );
        assert!(
            names.insert(name.to_string()),
            "\n\nCATALOG BUILD ERROR: Duplicate interval '{name}' on line {line_number}\n\
             Interval names must be unique.\n"
        );
        count += 1;
    }

    assert!(
        count > 0,
        "\n\nCATALOG BUILD ERROR: Catalog has no intervals\n"
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=data/ics2020.csv");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
