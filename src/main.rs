use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    reasonstream::cli::main()
}
