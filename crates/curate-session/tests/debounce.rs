use std::time::Duration;

use curate_session::Debouncer;
use tokio::time::Instant;

#[test]
fn fires_once_after_a_quiet_period() {
    let start = Instant::now();
    let ms = Duration::from_millis;
    let mut debouncer = Debouncer::new(ms(300));

    assert!(!debouncer.is_pending());
    assert!(!debouncer.fire(start + ms(1000)));

    debouncer.poke(start);
    debouncer.poke(start + ms(200));
    assert_eq!(debouncer.deadline(), Some(start + ms(500)));

    assert!(!debouncer.fire(start + ms(400)));
    assert!(debouncer.fire(start + ms(500)));
    assert!(!debouncer.fire(start + ms(600)));
    assert!(!debouncer.is_pending());
}
