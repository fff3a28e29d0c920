use clap::Parser;
use itertools::Itertools;
use kanri::prelude::*;
use std::fs;
use std::process;
use std::time::Instant;

/// A schema-to-form compilation engine CLI
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the connector specification JSON file
    spec_path: String,

    /// Base path compiled field addresses are rooted at
    #[arg(short, long, default_value = DEFAULT_BASE_PATH)]
    base_path: String,

    /// Connector name recorded in the saved artifact
    #[arg(short, long, default_value = "connector")]
    connector: String,

    /// Optional path to save the compiled form as a bincode artifact
    #[arg(short, long)]
    artifact: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let total_start = Instant::now();

    // --- 1. File Loading ---
    let load_start = Instant::now();
    let spec_json = fs::read_to_string(&cli.spec_path).unwrap_or_else(|e| {
        exit_with_error(&format!(
            "Failed to read spec file '{}': {}",
            &cli.spec_path, e
        ))
    });
    let raw: serde_json::Value = serde_json::from_str(&spec_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse spec JSON: {}", e)));
    let load_duration = load_start.elapsed();

    // --- 2. Conversion and Compilation ---
    println!("\nStarting connector spec compilation...");
    let compile_start = Instant::now();
    let schema = raw
        .into_schema()
        .unwrap_or_else(|e| exit_with_error(&format!("Schema conversion failed: {}", e)));
    let compiler = SpecCompiler::builder(schema)
        .base_path(&cli.base_path)
        .build();
    let fields = compiler
        .compile()
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));
    let compile_duration = compile_start.elapsed();

    let leaf_count = all_leaves(&fields).len();
    println!(
        "Compilation successful! {} top-level fields, {} leaves in {:?}",
        fields.len(),
        leaf_count,
        compile_duration
    );

    // --- 3. Field Tree ---
    println!("\n--- Compiled Field Tree ---");
    for field in &fields {
        print_field(field, 0);
    }

    // --- 4. Artifact ---
    if let Some(artifact_path) = &cli.artifact {
        let form = CompiledForm::new(&cli.connector, &cli.base_path, fields);
        form.save(artifact_path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save artifact: {}", e)));
        println!("\nArtifact saved to '{}'", artifact_path);
    }

    let total_duration = total_start.elapsed();
    println!("\n--- Performance Summary ---");
    println!("File Loading:  {:?}", load_duration);
    println!("Compilation:   {:?}", compile_duration);
    println!("---------------------------");
    println!("Total:         {:?}", total_duration);
    println!();
}

fn print_field(field: &FieldSpec, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if field.is_group() { "+" } else { "-" };
    let mut line = format!("{}{} {} [order {}]", indent, marker, field.path, field.order);
    if field.required {
        line.push_str(" (required)");
    }
    if !field.enum_values.is_empty() {
        let options = field.enum_values.iter().map(|v| v.to_string()).join(", ");
        line.push_str(&format!(" options: {}", options));
    }
    if let Some(parent) = &field.parent_discriminator {
        line.push_str(&format!(" when {}", parent));
    }
    println!("{}", line);
    for child in &field.children {
        print_field(child, depth + 1);
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
