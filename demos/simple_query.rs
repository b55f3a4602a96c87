// Demonstration of column introspection and the query pipeline
// Author: Gabriel Demetrios Lafis

use anyhow::Result;

use csv_query_api::data::introspect;
use csv_query_api::query::run_query;

fn main() -> Result<()> {
    let bytes = b"city,population,area\n\
        Tokyo,13960000,2194.0\n\
        Berlin,3645000,891.7\n\
        Reykjavik,131136,273.0\n\
        Sydney,5312000,12368.0\n";

    println!("Columns:");
    for info in introspect(bytes)? {
        println!("  {} ({})", info.name, info.column_type);
    }

    // Keep cities above one million people, largest first
    let result = run_query(
        bytes,
        Some("population__gt__1000000"),
        Some("population:false"),
    )?;

    println!("\nFiltered and sorted:");
    print!("{}", String::from_utf8(result)?);

    Ok(())
}
