use anyhow::{Context, Result};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Baseline profile for one country; yearly rows are derived from it with
/// noise and a mild growth trend.
struct CountryProfile {
    name: &'static str,
    region: &'static str,
    gdp: f64,
    growth: f64,
    inflation: f64,
    unemployment: f64,
    population: f64,
    manufacturing: f64,
    energy: f64,
    digital: f64,
    carbon: f64,
    exports: f64,
    imports: f64,
}

const PROFILES: [CountryProfile; 8] = [
    CountryProfile { name: "India", region: "Asia", gdp: 2900.0, growth: 6.4, inflation: 5.3, unemployment: 7.4, population: 1400.0, manufacturing: 460.0, energy: 1600.0, digital: 0.48, carbon: 2700.0, exports: 420.0, imports: 510.0 },
    CountryProfile { name: "China", region: "Asia", gdp: 17800.0, growth: 5.1, inflation: 2.0, unemployment: 5.2, population: 1410.0, manufacturing: 1800.0, energy: 8500.0, digital: 0.72, carbon: 11500.0, exports: 3400.0, imports: 2700.0 },
    CountryProfile { name: "USA", region: "Americas", gdp: 25400.0, growth: 2.2, inflation: 3.1, unemployment: 3.9, population: 333.0, manufacturing: 700.0, energy: 4100.0, digital: 0.88, carbon: 5000.0, exports: 2100.0, imports: 3300.0 },
    CountryProfile { name: "Brazil", region: "Americas", gdp: 1900.0, growth: 2.8, inflation: 6.2, unemployment: 9.5, population: 215.0, manufacturing: 180.0, energy: 640.0, digital: 0.61, carbon: 480.0, exports: 330.0, imports: 270.0 },
    CountryProfile { name: "Germany", region: "Europe", gdp: 4100.0, growth: 1.1, inflation: 2.9, unemployment: 3.2, population: 84.0, manufacturing: 520.0, energy: 540.0, digital: 0.84, carbon: 670.0, exports: 1650.0, imports: 1440.0 },
    CountryProfile { name: "France", region: "Europe", gdp: 2800.0, growth: 1.3, inflation: 2.6, unemployment: 7.2, population: 68.0, manufacturing: 260.0, energy: 460.0, digital: 0.81, carbon: 300.0, exports: 720.0, imports: 810.0 },
    CountryProfile { name: "Nigeria", region: "Africa", gdp: 480.0, growth: 3.0, inflation: 17.5, unemployment: 9.8, population: 218.0, manufacturing: 55.0, energy: 31.0, digital: 0.36, carbon: 130.0, exports: 62.0, imports: 55.0 },
    CountryProfile { name: "Australia", region: "Oceania", gdp: 1700.0, growth: 2.4, inflation: 3.5, unemployment: 3.7, population: 26.0, manufacturing: 95.0, energy: 250.0, digital: 0.86, carbon: 390.0, exports: 410.0, imports: 330.0 },
];

const YEARS: std::ops::RangeInclusive<i32> = 2018..=2023;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let output_path = "sample_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    writer
        .write_record([
            "Country",
            "Region",
            "Year",
            "GDP (Billion USD)",
            "Economic Growth (%)",
            "Inflation (%)",
            "Unemployment Rate (%)",
            "Population (Millions)",
            "Manufacturing Output (Million Units)",
            "Energy Consumption (GWh)",
            "Digital Adoption Index (0-1)",
            "Carbon Emission (MT)",
            "Export Revenue (Billion USD)",
            "Import Cost (Billion USD)",
        ])
        .context("writing header")?;

    let mut rows = 0usize;
    for profile in &PROFILES {
        for year in YEARS {
            // Compound the baseline growth rate away from 2020, plus noise.
            let age = (year - 2020) as f64;
            let trend = (1.0 + profile.growth / 100.0).powf(age);
            let jitter = |rng: &mut SimpleRng, scale: f64| rng.gauss(1.0, scale);

            let gdp = profile.gdp * trend * jitter(&mut rng, 0.02);
            let growth = rng.gauss(profile.growth, 0.6);
            let inflation = rng.gauss(profile.inflation, 0.8).max(0.0);
            let unemployment = rng.gauss(profile.unemployment, 0.5).max(0.5);
            let population = profile.population * (1.0 + 0.008 * age);
            let manufacturing = profile.manufacturing * trend * jitter(&mut rng, 0.04);
            let energy = profile.energy * trend * jitter(&mut rng, 0.03);
            let digital = (profile.digital + 0.02 * age + rng.gauss(0.0, 0.01)).clamp(0.0, 1.0);
            let carbon = profile.carbon * jitter(&mut rng, 0.03);
            let exports = profile.exports * trend * jitter(&mut rng, 0.05);
            let imports = profile.imports * trend * jitter(&mut rng, 0.05);

            writer
                .write_record([
                    profile.name.to_string(),
                    profile.region.to_string(),
                    year.to_string(),
                    format!("{gdp:.1}"),
                    format!("{growth:.2}"),
                    format!("{inflation:.2}"),
                    format!("{unemployment:.2}"),
                    format!("{population:.1}"),
                    format!("{manufacturing:.1}"),
                    format!("{energy:.1}"),
                    format!("{digital:.3}"),
                    format!("{carbon:.1}"),
                    format!("{exports:.1}"),
                    format!("{imports:.1}"),
                ])
                .with_context(|| format!("writing row for {} {year}", profile.name))?;
            rows += 1;
        }
    }

    writer.flush().context("flushing output")?;
    println!("Wrote {rows} rows for {} countries to {output_path}", PROFILES.len());
    Ok(())
}
