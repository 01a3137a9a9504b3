use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const HEADER: [&str; 10] = [
    "Player Name",
    "Player's Role",
    "Total Goals",
    "Duels Won %",
    "Pass Accuracy %",
    "Successful Dribbles %",
    "Shot Accuracy %",
    "Fouls Committed",
    "Yellow Cards",
    "xG (expected goals)",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn count(&mut self, max: u64) -> u64 {
        self.next_u64() % (max + 1)
    }
}

/// Per-role shape of a season line: (role, players, goals max, duel range,
/// pass range, dribble range, shot range, fouls max).
type Profile = (&'static str, usize, u64, (f64, f64), (f64, f64), (f64, f64), (f64, f64), u64);

const PROFILES: [Profile; 4] = [
    ("ATTACKER", 6, 14, (0.35, 0.55), (0.60, 0.78), (0.40, 0.65), (0.35, 0.60), 18),
    ("MIDFIELDER", 8, 6, (0.45, 0.60), (0.72, 0.90), (0.45, 0.70), (0.25, 0.50), 22),
    ("DEFENDER", 8, 2, (0.55, 0.75), (0.70, 0.88), (0.30, 0.60), (0.15, 0.40), 26),
    ("GOALKEEPER", 3, 0, (0.0, 0.0), (0.45, 0.70), (0.0, 0.0), (0.0, 0.0), 2),
];

const FIRST: [&str; 10] = ["Alex", "Ben", "Chris", "Dan", "Eli", "Finn", "Gabe", "Hugo", "Ian", "Jon"];
const LAST: [&str; 10] = [
    "Moreno", "Walsh", "Okafor", "Larsen", "Pereira", "Novak", "Kim", "Byrne", "Adler", "Silva",
];

/// `-` where the stat is not recorded for the player.
fn pct(rng: &mut SimpleRng, (lo, hi): (f64, f64), recorded: bool) -> String {
    if recorded {
        format!("{:.3}", rng.range(lo, hi))
    } else {
        "-".to_string()
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<[String; 10]> {
    let mut rows = Vec::new();
    let mut n = 0usize;
    for (role, players, goals_max, duel, pass, dribble, shot, fouls_max) in PROFILES {
        let keeper = role == "GOALKEEPER";
        for _ in 0..players {
            let name = format!("{} {}", FIRST[n % FIRST.len()], LAST[(n * 7 + 3) % LAST.len()]);
            n += 1;

            let goals = rng.count(goals_max);
            let fouls = rng.count(fouls_max);
            let yellows = rng.count(fouls / 4);
            let xg = if keeper { 0.0 } else { goals as f64 * rng.range(0.7, 1.3) };
            // Bench players: no attempted dribbles or shots recorded.
            let played_up = rng.next_f64() > 0.15;

            rows.push([
                name,
                role.to_string(),
                goals.to_string(),
                pct(rng, duel, !keeper),
                pct(rng, pass, true),
                pct(rng, dribble, !keeper && played_up),
                pct(rng, shot, !keeper && played_up),
                fouls.to_string(),
                yellows.to_string(),
                format!("{xg:.2}"),
            ]);
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[[String; 10]]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADER).context("writing CSV header")?;
    for row in rows {
        writer.write_record(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

/// Every column as Utf8, the same raw text the CSV export carries.
fn write_parquet(path: &Path, rows: &[[String; 10]]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        HEADER
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..HEADER.len())
        .map(|col| {
            let values: Vec<&str> = rows.iter().map(|row| row[col].as_str()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_season.csv"));

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output_path, &rows)?;
    } else {
        write_csv(&output_path, &rows)?;
    }

    println!("Wrote {} players to {}", rows.len(), output_path.display());
    Ok(())
}
