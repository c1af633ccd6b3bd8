use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use jsonpipe::evaluator::evaluate;
use jsonpipe::prelude::*;
use jsonpipe::tokenizer::tokenize;
use serde_json::json;

fn criterion_benchmark(c: &mut Criterion) {
    let registry = Registry::builtin();
    let source = json!({
        "weather": {"temp": "66.0 F (18.9 C)"},
        "a": {"X": 3, "Y": 2},
        "list": ["aa", "bb", "ccc"]
    });

    let mut group = c.benchmark_group("expression");
    for expression in &[
        "a.X",
        "a $ .X $ toString",
        "weather.temp $ words $ 2 $ rmFirst $ toFloat $ + 1.0",
        "$ list a.X a.Y 5 $ sorted $ sum",
    ] {
        group.throughput(Throughput::Bytes(expression.len() as u64));
        group.bench_function(*expression, |b| {
            b.iter(|| evaluate(&registry, &source, expression, ""))
        });
    }
    group.finish();

    let mut group = c.benchmark_group("tokenize");
    let expression = r#"$ list c b.p.d.q "hello world" 'x y' $ join "-" $ upper"#;
    group.throughput(Throughput::Bytes(expression.len() as u64));
    group.bench_function("quoted", |b| b.iter(|| tokenize(expression)));
    group.finish();

    let trans = TransformerBuilder::default().build().unwrap();
    let template = TransformSpec::from(json!({
        "new1": "top1",
        "new2": "top2 $ upper",
        "new3": "top3 $ length",
        "nested": {"new4": "top4", "new5": ["top5", "top6"]}
    }));
    let input = r#"
    {
        "top1": "value",
        "top2": "value",
        "top3": "value",
        "top4": "value",
        "top5": "value",
        "top6": "value"
    }"#;

    let mut group = c.benchmark_group("transform");
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("top_level", |b| {
        b.iter(|| trans.apply_from_str(&template, input))
    });

    let input = r#"[
        {"top1": "value"},
        {"top2": "value"},
        {"top3": "value"},
        {"top4": "value"},
        {"top5": "value"},
        {"top6": "value"}
    ]"#;
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("many_2_many", |b| {
        b.iter(|| trans.apply_from_str(&template, input))
    });

    let template = TransformSpec::from_config(json!({
        "name": "name",
        "skills": {
            "_source_col_name": "skills",
            "_type_change": "list",
            "template": {"skill": "name $ upper", "years": "years $ toInt"}
        }
    }))
    .unwrap();
    let input = r#"{
        "name": "joe",
        "skills": [
            {"name": "rust", "years": "3"},
            {"name": "go", "years": "2"},
            {"name": "sql", "years": "9"}
        ]
    }"#;
    group.throughput(Throughput::Bytes(input.len() as u64));
    group.bench_function("nested_records", |b| {
        b.iter(|| trans.apply_from_str(&template, input))
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
