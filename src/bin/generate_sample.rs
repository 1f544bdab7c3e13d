use anyhow::{Context, Result};
use capex_dashboard::data::model::Column;

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Financial summary cell in the free-text style of the source sheet.
fn financial_text(rng: &mut SimpleRng) -> String {
    let roll = rng.next_f64();
    if roll < 0.15 {
        "-".to_string()
    } else if roll < 0.25 {
        "N/A".to_string()
    } else if roll < 0.6 {
        format!("IRR {:.1}%", 5.0 + rng.next_f64() * 30.0)
    } else if roll < 0.85 {
        format!(
            "{:.1}% / NPV {:.1} MB / PB {:.1} yrs",
            rng.next_f64() * 40.0 - 5.0,
            rng.next_f64() * 20.0,
            1.0 + rng.next_f64() * 6.0
        )
    } else {
        format!("PB {} years", 1 + rng.next_u64() % 8)
    }
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(2026);

    // Trailing spaces mimic hand-typed cells; they must merge on load.
    let factories = ["Plant A", "Plant A ", "Plant B", " Plant C", "Plant D"];
    let categories = ["Automation", "Safety", "Energy Saving", "IT", "Quality ", "Capacity"];
    let objectives = [
        "Reduce manual handling",
        "Comply with new regulation",
        "Cut electricity usage",
        "Replace end-of-life equipment",
        "Increase line throughput",
    ];
    let benefits = [
        "Lower labour cost",
        "Fewer incidents",
        "Energy saving 12%",
        "Less downtime",
        "Higher yield",
    ];

    let output_path = "CapEx_2026.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    // Padded headers as exported from the source workbook.
    let headers: Vec<String> = Column::ALL
        .iter()
        .map(|c| format!(" {} ", c.source_name()))
        .chain(std::iter::once("Remark".to_string()))
        .collect();
    writer.write_record(&headers)?;

    let n_projects = 40;
    for i in 0..n_projects {
        let budget = if i % 17 == 16 {
            "TBD".to_string()
        } else {
            format!("{:.0}", (50_000.0 + rng.next_f64() * 4_950_000.0).round())
        };
        let factory = if i % 19 == 18 { "" } else { rng.pick(&factories) };
        let remark = if i % 5 == 0 { "carry-over from 2025" } else { "" };

        writer.write_record([
            format!("CAPEX-26-{:03} {}", i + 1, rng.pick(&objectives)),
            budget,
            factory.to_string(),
            rng.pick(&categories).to_string(),
            rng.pick(&objectives).to_string(),
            rng.pick(&benefits).to_string(),
            financial_text(&mut rng),
            remark.to_string(),
        ])?;
    }
    writer.flush()?;

    println!("Wrote {n_projects} projects to {output_path}");
    Ok(())
}
