//! Tool implementations and argument decoding

use serde_json::{json, Value as JsonValue};
use sle_core::{validate_size, PivotStrategy, SleError, SolveMethod};
use sle_solver::{
    check_compatibility, export_system, identity, lu_factorize, plain_decimal, render_augmented,
    render_matrix, verify, Matrix, SolveRequest, Vector,
};
use tracing::debug;
use crate::config::ServerConfig;

pub const TOOL_NAMES: [&str; 5] = ["solve", "factorize", "check_compatibility", "verify", "identity"];

/// Run a tool; solver failures come back as `Err(SleError)`
pub fn call_tool(config: &ServerConfig, name: &str, args: &JsonValue) -> Option<Result<JsonValue, SleError>> {
    let result = match name {
        "solve" => tool_solve(config, args),
        "factorize" => tool_factorize(args),
        "check_compatibility" => tool_check_compatibility(args),
        "verify" => tool_verify(args),
        "identity" => tool_identity(args),
        _ => return None,
    };
    Some(result)
}

/// Wrap a tool outcome in the MCP `tools/call` result shape
pub fn tool_result(outcome: Result<JsonValue, SleError>) -> JsonValue {
    match outcome {
        Ok(data) => {
            let text = data.get("text").and_then(|t| t.as_str()).unwrap_or("").to_string();
            json!({
                "content": [{ "type": "text", "text": text }],
                "data": data,
                "isError": false
            })
        }
        Err(err) => json!({
            "content": [{ "type": "text", "text": err.to_string() }],
            "error": serde_json::to_value(&err).unwrap_or(JsonValue::Null),
            "isError": true
        }),
    }
}

fn tool_solve(config: &ServerConfig, args: &JsonValue) -> Result<JsonValue, SleError> {
    let a = extract_matrix(args, "A")?;
    let b = extract_vector(args, "b")?;
    let strategy = extract_pivot(args)?;
    let method = extract_method(args)?;
    let correction = args.get("error_correction").and_then(|v| v.as_bool());

    let report = SolveRequest::new(a, b)?
        .with_strategy(strategy)
        .with_method(method)
        .with_rounding(config.rounding_for(correction))
        .execute()?;

    let mut text = String::new();
    if let Some(gauss) = &report.gauss {
        text.push_str("Reduced system:\n");
        text.push_str(&render_augmented(&gauss.reduced_a, &gauss.reduced_b));
        text.push_str(&format!("\nAx=b result vector: {}\n", gauss.x));
    }
    if let Some(lu) = &report.lu {
        text.push_str(&format!("{} result vector: {}\n", lu.label, lu.x));
    }
    text.push_str(&format!("Residual norm: {}", plain_decimal(report.residual.norm)));

    let mut data = serde_json::to_value(&report)
        .map_err(|e| SleError::internal(format!("serializing report: {}", e)))?;
    data["text"] = JsonValue::String(text);
    Ok(data)
}

fn tool_factorize(args: &JsonValue) -> Result<JsonValue, SleError> {
    let a = extract_matrix(args, "A")?;
    validate_size(a.size())?;
    let strategy = extract_pivot(args)?;

    let factorization = lu_factorize(&a, strategy);
    let text = format!(
        "L =\n{}\nU =\n{}\nP =\n{}\nQ =\n{}",
        render_matrix(&factorization.l),
        render_matrix(&factorization.u),
        render_matrix(&factorization.p),
        render_matrix(&factorization.q),
    );

    let mut data = serde_json::to_value(&factorization)
        .map_err(|e| SleError::internal(format!("serializing factorization: {}", e)))?;
    data["pivot_type"] = json!(factorization.pivot_type());
    data["text"] = JsonValue::String(text);
    Ok(data)
}

fn tool_check_compatibility(args: &JsonValue) -> Result<JsonValue, SleError> {
    let a = extract_matrix(args, "A")?;
    let b = extract_vector(args, "b")?;
    validate_size(a.size())?;
    if b.len() != a.size() {
        return Err(SleError::dimension_mismatch("right-hand side", a.size(), b.len()));
    }

    let verdict = check_compatibility(&a, &b);
    debug!(?verdict, "compatibility checked");
    let (compatible, verdict_json, text) = match verdict {
        Ok(()) => (true, JsonValue::String("unique".to_string()), "The system has a unique solution".to_string()),
        Err(cause) => (
            false,
            serde_json::to_value(cause).unwrap_or(JsonValue::Null),
            format!("{} ({})", cause, export_system(&a, &b)),
        ),
    };

    Ok(json!({ "compatible": compatible, "verdict": verdict_json, "text": text }))
}

fn tool_verify(args: &JsonValue) -> Result<JsonValue, SleError> {
    let a = extract_matrix(args, "A")?;
    let b = extract_vector(args, "b")?;
    let x = extract_vector(args, "x")?;

    let residual = verify(&a, &b, &x)?;
    let norm_plain = plain_decimal(residual.norm);
    let text = format!(
        "Vector b:\n{}\n\nVector result A * X:\n{}\n\nNorm of the resulting vector A*X-b:\n{}\n{}",
        b, residual.ax, residual.norm, norm_plain
    );

    Ok(json!({
        "Ax": residual.ax,
        "norm": residual.norm,
        "norm_plain": norm_plain,
        "text": text
    }))
}

fn tool_identity(args: &JsonValue) -> Result<JsonValue, SleError> {
    let size = args
        .get("size")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| SleError::invalid_argument("size", "expected a non-negative integer"))?;
    let size = validate_size(size as usize)?;
    let m = identity(size);
    Ok(json!({ "matrix": m, "text": render_matrix(&m) }))
}

// ============================================================================
// Argument decoding
// ============================================================================

/// Extract a square matrix from a list of numeric rows
pub fn extract_matrix(args: &JsonValue, name: &str) -> Result<Matrix, SleError> {
    let rows = args
        .get(name)
        .and_then(|v| v.as_array())
        .ok_or_else(|| SleError::invalid_argument(name, "expected a list of rows"))?;

    let mut data = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let cols = row
            .as_array()
            .ok_or_else(|| SleError::invalid_argument(name, format!("row {} must be a list", i)))?;
        let mut values = Vec::with_capacity(cols.len());
        for (j, cell) in cols.iter().enumerate() {
            values.push(extract_number(cell).ok_or_else(|| {
                SleError::invalid_argument(name, format!("{}[{}][{}] must be a finite number", name, i, j))
            })?);
        }
        data.push(values);
    }

    Matrix::from_rows(data)
}

/// Extract a vector from a list of numbers
pub fn extract_vector(args: &JsonValue, name: &str) -> Result<Vector, SleError> {
    let items = args
        .get(name)
        .and_then(|v| v.as_array())
        .ok_or_else(|| SleError::invalid_argument(name, "expected a list of numbers"))?;

    let mut values = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        values.push(extract_number(item).ok_or_else(|| {
            SleError::invalid_argument(name, format!("{}[{}] must be a finite number", name, i))
        })?);
    }
    Ok(Vector::from_vec(values))
}

/// Numbers may arrive as JSON numbers or numeric strings; only finite
/// values are accepted
fn extract_number(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// `pivot` as a name or a numeric tag; defaults to none
pub fn extract_pivot(args: &JsonValue) -> Result<PivotStrategy, SleError> {
    match args.get("pivot") {
        None | Some(JsonValue::Null) => Ok(PivotStrategy::default()),
        Some(JsonValue::String(s)) => PivotStrategy::from_str(s)
            .ok_or_else(|| SleError::invalid_argument("pivot", format!("unknown strategy '{}'", s))),
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .and_then(|t| u8::try_from(t).ok())
            .and_then(PivotStrategy::from_tag)
            .ok_or_else(|| SleError::invalid_argument("pivot", format!("unknown tag {}", n))),
        Some(other) => Err(SleError::invalid_argument("pivot", format!("unexpected value {}", other))),
    }
}

/// `method` as a name; defaults to gauss
pub fn extract_method(args: &JsonValue) -> Result<SolveMethod, SleError> {
    match args.get("method") {
        None | Some(JsonValue::Null) => Ok(SolveMethod::default()),
        Some(JsonValue::String(s)) => SolveMethod::from_str(s)
            .ok_or_else(|| SleError::invalid_argument("method", format!("unknown method '{}'", s))),
        Some(other) => Err(SleError::invalid_argument("method", format!("unexpected value {}", other))),
    }
}
