// 命令行入口: 执行一次导入入口或测试工具调用，结果以 JSON 输出到 stdout
//
// Usage:
//   agent-fixtures <db_path> <command> [args...]
//
// Commands:
//   excel-to-table <path> <sheet> <rule_json> [from] [chunk_size]
//   table-to-table <source> <target> <report> [from] [chunk_size] [cleaner]
//     (命令行不注册清洗函数，指定 cleaner 时返回"清洗函数未注册")
//   count-model <model>
//   count-model-where <model> <wheres_json>
//   count-rows <path> <sheet>
//   get-id <model> <field_json> <value_json>
//   preview-message <params_json>
//   tool <server> <tool> [args_json]

use agent_fixtures::domain::{PreviewParams, Rule};
use agent_fixtures::{logging, ImportApi, ToolRegistry};
use serde_json::{Map, Value};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const USAGE: &str = "usage: agent-fixtures <db_path> <command> [args...]";

/// 位置参数读取
struct Args {
    values: Vec<String>,
}

impl Args {
    fn required(&self, index: usize, name: &str) -> CliResult<&str> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| format!("missing argument <{}>\n{}", name, USAGE).into())
    }

    fn json(&self, index: usize, name: &str) -> CliResult<Value> {
        let raw = self.required(index, name)?;
        // 非 JSON 文本按字符串处理（如 get-id 的字段名）
        Ok(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())))
    }

    fn optional_usize(&self, index: usize) -> CliResult<Option<usize>> {
        self.values
            .get(index)
            .map(|s| s.parse::<usize>().map_err(|e| e.into()))
            .transpose()
    }
}

fn run(db_path: &str, command: &str, args: &Args) -> CliResult<Value> {
    if command == "tool" {
        let registry = ToolRegistry::new();
        let tool_args = match args.values.get(2) {
            Some(raw) => serde_json::from_str(raw)?,
            None => Value::Object(Map::new()),
        };
        return Ok(registry.call(args.required(0, "server")?, args.required(1, "tool")?, &tool_args)?);
    }

    let api = ImportApi::open(db_path)?;
    let result = match command {
        "excel-to-table" => {
            let rule: Rule = serde_json::from_str(args.required(2, "rule_json")?)?;
            let data = api.excel_to_table(
                args.required(0, "path")?,
                args.required(1, "sheet")?,
                &rule,
                args.optional_usize(3)?,
                args.optional_usize(4)?,
            )?;
            serde_json::to_value(data)?
        }
        "table-to-table" => {
            let report = api.table_to_table(
                args.required(0, "source")?,
                args.required(1, "target")?,
                args.required(2, "report")?,
                args.values.get(5).map(String::as_str),
                args.optional_usize(3)?,
                args.optional_usize(4)?,
            )?;
            serde_json::to_value(report)?
        }
        "count-model" => Value::from(api.count_model(args.required(0, "model")?)?),
        "count-model-where" => {
            let wheres = match args.json(1, "wheres_json")? {
                Value::Object(map) => map,
                other => return Err(format!("wheres must be an object: {}", other).into()),
            };
            Value::from(api.count_model_where(args.required(0, "model")?, &wheres)?)
        }
        "count-rows" => Value::from(api.count_rows(args.required(0, "path")?, args.required(1, "sheet")?)?),
        "get-id" => api.get_id(
            args.required(0, "model")?,
            &args.json(1, "field_json")?,
            &args.json(2, "value_json")?,
        )?,
        "preview-message" => {
            let params: PreviewParams = serde_json::from_str(args.required(0, "params_json")?)?;
            serde_json::to_value(api.preview_message(&params)?)?
        }
        other => return Err(format!("unknown command: {}\n{}", other, USAGE).into()),
    };
    Ok(result)
}

fn main() -> CliResult<()> {
    logging::init();

    let mut argv = std::env::args().skip(1);
    let db_path = argv.next().ok_or(USAGE)?;
    let command = argv.next().ok_or(USAGE)?;
    let args = Args {
        values: argv.collect(),
    };

    tracing::info!(version = agent_fixtures::VERSION, command = %command, "{}", agent_fixtures::APP_NAME);
    let result = run(&db_path, &command, &args)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
