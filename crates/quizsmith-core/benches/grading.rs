use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizsmith_core::grader::grade;
use quizsmith_core::model::{Question, Selections};

fn make_questions(n: usize) -> Vec<Question> {
    (1..=n)
        .map(|i| Question {
            text: format!("Question {i}?"),
            options: (0..4).map(|o| format!("Option {i}-{o}")).collect(),
            answer: format!("Option {i}-{}", i % 4),
        })
        .collect()
}

fn make_selections(questions: &[Question], every: usize) -> Selections {
    questions
        .iter()
        .enumerate()
        .filter(|(idx, _)| idx % every == 0)
        .map(|(idx, q)| (idx + 1, q.options[idx % 4].clone()))
        .collect()
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");

    for n in [10, 100, 1000] {
        let questions = make_questions(n);
        let all = make_selections(&questions, 1);
        let sparse = make_selections(&questions, 3);

        group.bench_function(format!("all_answered_{n}"), |b| {
            b.iter(|| grade(black_box(&questions), black_box(&all)))
        });

        group.bench_function(format!("sparse_{n}"), |b| {
            b.iter(|| grade(black_box(&questions), black_box(&sparse)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grade);
criterion_main!(benches);
