use data_loader::load_users;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = Path::new("data/netflix_users.csv");

    println!("Loading viewing-habit dataset...\n");

    let start = Instant::now();
    let load = load_users(path).expect("Failed to load dataset");
    let elapsed = start.elapsed();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", load.users.len());
    println!("Rejected rows: {}", load.rejected.len());
    println!("\nPerformance: {:.0} rows/second",
             (load.users.len() + load.rejected.len()) as f64 / elapsed.as_secs_f64());
}
