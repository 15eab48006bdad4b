use procscope::ProcessAccess;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let masks = std::env::args().skip(1).collect::<Vec<_>>();
    if masks.is_empty() {
        println!("usage: access-mask <mask>...");
        return Ok(());
    }

    for mask in masks {
        let bits = match mask.strip_prefix("0x") {
            Some(hex) => u32::from_str_radix(hex, 16)?,
            None => mask.parse()?,
        };

        let access = ProcessAccess::from_bits_retain(bits);
        tracing::debug!(bits, names = ?access.names());

        println!("{bits:#010x} {access}");
    }

    Ok(())
}
