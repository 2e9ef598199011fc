use chrono::{Duration, FixedOffset, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use weatherer::readers::{Decoder, EncodingDecoder, ObservationReader};
use weatherer::utils::constants::OBSERVATION_DATETIME_FORMAT;

// Shift_JIS export with the usual 5-row preamble and one row per hour
fn create_export(hours: usize) -> Vec<u8> {
    let mut text = String::new();
    text.push_str("ダウンロードした時刻：2020/02/01 10:00:00\r\n");
    text.push_str(",東京,東京,東京\r\n");
    text.push_str("年月日時,気温(℃),気温(℃),気温(℃),降水量(mm)\r\n");
    text.push_str(",,品質情報,均質番号,,品質情報\r\n");
    text.push_str(",,,,,現象なし情報\r\n");

    let start = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(1, 0, 0)
        .unwrap();
    for hour in 0..hours {
        let ts = start + Duration::hours(hour as i64);
        let temperature = 5.0 + (hour % 24) as f64 * 0.4;
        text.push_str(&format!(
            "{},{:.1},8,1,0,0,1,{:.1},8,北北西,8\r\n",
            ts.format(OBSERVATION_DATETIME_FORMAT),
            temperature,
            (hour % 10) as f64 * 0.3
        ));
    }

    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&text);
    bytes.into_owned()
}

fn benchmark_decode(c: &mut Criterion) {
    let bytes = create_export(24 * 31);
    let decoder = EncodingDecoder::shift_jis();

    c.bench_function("decode_shift_jis_month", |b| {
        b.iter(|| decoder.decode(black_box(&bytes)).unwrap())
    });
}

fn benchmark_parse_observations(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_observations");
    let reader = ObservationReader::new(FixedOffset::east_opt(9 * 3600).unwrap());

    for days in [1, 31, 365].iter() {
        let bytes = create_export(24 * days);
        group.bench_with_input(BenchmarkId::new("days", days), &bytes, |b, bytes| {
            b.iter(|| reader.parse_observations("tokyo", black_box(bytes)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_decode, benchmark_parse_observations);
criterion_main!(benches);
