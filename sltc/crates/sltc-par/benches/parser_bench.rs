//! Parser benchmarks: lex + Stage-1 block parsing + Stage-2 expression
//! parsing over representative source snippets.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sltc_par::parse_blocks;
use sltc_util::Handler;

fn parse_source(source: &str) {
    let mut handler = Handler::new();
    let tokens = sltc_lex::lex(source, &mut handler).expect("lex ok");
    parse_blocks(tokens, &mut handler).expect("parse ok");
}

fn bench_parser_assignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_assignment");
    let source = "x = 42";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("let_statement", |b| b.iter(|| parse_source(black_box(source))));
    group.finish();
}

fn bench_parser_function(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_function");
    let source = r#"
        Function Fib(n)
            If n <= 1 Then
                Fib = n
            Else
                Fib = Fib(n - 1) + Fib(n - 2)
            End If
        End Function
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("recursive_function", |b| {
        b.iter(|| parse_source(black_box(source)))
    });
    group.finish();
}

fn bench_parser_class(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_class");
    let source = r#"
        Class Point
            Private mX
            Private mY

            Public Sub Init(x, y)
                mX = x
                mY = y
            End Sub

            Public Function DistanceTo(other)
                Dim dx, dy
                dx = mX - other.GetX()
                dy = mY - other.GetY()
                DistanceTo = Sqr(dx * dx + dy * dy)
            End Function
        End Class
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("class_with_methods", |b| {
        b.iter(|| parse_source(black_box(source)))
    });
    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");
    let source = r#"
        For i = 1 To 10
            If i Mod 2 = 0 Then
                Do While running
                    Select Case i
                        Case 1, 2, 3
                            x = x + 1
                        Case Else
                            x = x - 1
                    End Select
                    running = x < 100
                Loop
            End If
        Next
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("nested_control_flow", |b| {
        b.iter(|| parse_source(black_box(source)))
    });
    group.finish();
}

fn bench_parser_complex_expression(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex_expression");
    let source = "x = 1 + 2 * 3 - 4 / 2 ^ 2 Mod 5 And Not (a Or b) & \"suffix\"";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("precedence_ladder", |b| {
        b.iter(|| parse_source(black_box(source)))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_parser_assignment,
    bench_parser_function,
    bench_parser_class,
    bench_parser_control_flow,
    bench_parser_complex_expression
);
criterion_main!(benches);
