//! Benchmarks for triple ingestion.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use graph_delta_loader::config::SchemaFilter;
use graph_delta_loader::ingest::{DbpediaLoader, ImdbLoader, Statement};
use graph_delta_loader::source::LocalFiles;
use oxigraph::io::RdfFormat;

const RES: &str = "http://dbpedia.org/resource/";
const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

fn type_statements(n: usize) -> Vec<Statement> {
    (0..n)
        .map(|i| {
            Statement::resource(
                format!("{RES}E{i}"),
                RDF_TYPE,
                format!("http://dbpedia.org/ontology/T{}", i % 20),
            )
        })
        .collect()
}

fn data_statements(n: usize) -> Vec<Statement> {
    (0..n)
        .map(|i| {
            if i % 3 == 0 {
                Statement::literal(format!("{RES}E{i}"), "http://dbpedia.org/ontology/name", format!("Name {i}"))
            } else {
                Statement::resource(
                    format!("{RES}E{i}"),
                    "http://dbpedia.org/ontology/link",
                    format!("{RES}E{}", (i * 7 + 1) % n),
                )
            }
        })
        .collect()
}

fn bench_dbpedia(c: &mut Criterion) {
    let types = type_statements(10_000);
    let data = data_statements(10_000);

    c.bench_function("dbpedia_types_and_data_10k", |bench| {
        bench.iter(|| {
            let mut loader = DbpediaLoader::new(
                Box::new(LocalFiles::new(RdfFormat::NTriples)),
                SchemaFilter::disabled(),
                28,
            );
            loader
                .ingest_types("bench", types.iter().cloned().map(Ok))
                .unwrap();
            loader
                .ingest_data("bench", data.iter().cloned().map(Ok))
                .unwrap();
            black_box(loader.graph().edge_count())
        })
    });
}

fn bench_imdb(c: &mut Criterion) {
    let statements: Vec<_> = (0..10_000)
        .map(|i| {
            Statement::resource(
                format!("http://imdb.org/actor/nm{i}"),
                "http://imdb.org/actedin",
                format!("http://imdb.org/movie/tt{}", i % 500),
            )
        })
        .collect();

    c.bench_function("imdb_single_pass_10k", |bench| {
        bench.iter(|| {
            let mut loader = ImdbLoader::new(
                Box::new(LocalFiles::new(RdfFormat::NTriples)),
                SchemaFilter::disabled(),
                16,
            );
            loader
                .ingest("bench", statements.iter().cloned().map(Ok))
                .unwrap();
            black_box(loader.graph().vertex_count())
        })
    });
}

criterion_group!(benches, bench_dbpedia, bench_imdb);
criterion_main!(benches);
