use availability_engine::{
    available_slots_with_options, AvailabilityWindow, BookedInterval, DayTemplate, SlotOptions,
    WeeklyTemplate,
};
use chrono::{NaiveDate, Weekday};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn busy_day(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2025, 7, 17).unwrap();
    let day = DayTemplate::open([
        AvailabilityWindow::parse("06:00", "12:00").unwrap(),
        AvailabilityWindow::parse("13:00", "22:00").unwrap(),
    ])
    .unwrap();
    let template = WeeklyTemplate::closed().with_day(Weekday::Thu, day);
    let bookings: Vec<BookedInterval> = (0..40)
        .map(|i| {
            let start = availability_engine::from_minutes(360 + i * 23).unwrap();
            BookedInterval::new(date, start, 10).unwrap()
        })
        .collect();
    let options = SlotOptions { step_minutes: 5 };

    c.bench_function("slots_busy_day", |b| {
        b.iter(|| {
            available_slots_with_options(
                black_box(date),
                black_box(&template),
                black_box(&bookings),
                black_box(30),
                &options,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, busy_day);
criterion_main!(benches);
