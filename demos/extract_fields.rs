use llm_tagged_output::{parse, ExtractError, TagConfig};

const RESPONSE: &str = "\
Sure! Here is my reasoning.
<thinking>
The user wants the area of a 3x4 rectangle. Use <formula>A = w * h</formula>.
</thinking>
<plan>
<step>Read the dimensions</step>
<step>Multiply them</step>
</plan>
<answer>12</answer>
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = TagConfig::from_json(
        r#"{
            "thinking": "single",
            "plan": {"type": "single", "children": {"step": "list"}},
            "answer": "single"
        }"#,
    )?;

    let result = parse(RESPONSE, &config, false)?;

    println!("=== Fields ===");
    println!("{}", serde_json::to_string_pretty(&result)?);

    for warning in &result.warnings {
        println!("[warn] {}", warning.message);
    }

    // Strict mode turns the <formula> warning into a failure.
    match parse(RESPONSE, &config, true) {
        Ok(_) => println!("\nstrict: ok"),
        Err(ExtractError::Structure(err)) => println!("\nstrict: {}", err),
        Err(other) => return Err(other.into()),
    }

    Ok(())
}
