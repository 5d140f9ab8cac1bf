// Session scenarios (native).
// Drives a `LetterBook` through a recording surface with a simulated frame clock.

use letter_book::segment::{CharSpan, char_count};
use letter_book::{BookSurface, GuideState, LetterBook, LetterField, TypingConfig};

/// Card page stand-in: each line keeps the opacity of each of its characters.
#[derive(Default)]
struct Page {
    lines: Vec<Vec<f64>>,
    placeholders: usize,
    opened: bool,
    guide_hidden: bool,
    scrolls: Vec<usize>,
}

impl BookSurface for Page {
    type Line = usize;

    fn clear_lines(&mut self) {
        self.lines.clear();
        self.placeholders = 0;
    }
    fn append_line(&mut self) -> usize {
        self.lines.push(Vec::new());
        self.lines.len() - 1
    }
    fn fill_placeholders(&mut self, count: usize) {
        self.lines.clear();
        self.placeholders = count;
    }
    fn render_chars(&mut self, line: &mut usize, spans: &[CharSpan<'_>]) -> usize {
        let n = char_count(spans);
        self.lines[*line] = vec![1.0; n];
        n
    }
    fn set_char_opacity(&mut self, line: &usize, idx: usize, opacity: f64) {
        self.lines[*line][idx] = opacity;
    }
    fn scroll_into_view(&mut self, line: &usize) {
        self.scrolls.push(*line);
    }
    fn hide_guide(&mut self) {
        self.guide_hidden = true;
    }
    fn set_card_opened(&mut self, opened: bool) {
        self.opened = opened;
    }
}

const SHOWN: GuideState = GuideState::Shown;

fn three_lines() -> LetterBook<Page> {
    let source = LetterField::Text("aaaaa\nbbbbb\nccccc".into());
    LetterBook::new(Page::default(), Box::new(source), TypingConfig::default())
}

fn progress(book: &LetterBook<Page>, line: usize) -> f64 {
    book.typing().session().timeline(line).map(|t| t.progress()).unwrap_or(0.0)
}

#[test]
fn pause_and_resume_mid_line() {
    // 5 chars: 4 * 80 + 50 = 370ms per line
    let mut book = three_lines();
    book.tick(0.0);
    book.on_pointer_enter(SHOWN);
    assert!(book.typing().surface().opened);
    assert!(book.typing().session().timeline(0).is_some());
    assert_eq!(book.typing().surface().lines[0], vec![0.0; 5]);

    book.tick(100.0);
    let at_pause = progress(&book, 0);
    assert!(at_pause > 0.0 && at_pause < 1.0);

    book.on_pointer_leave(SHOWN);
    book.tick(5_000.0);
    let tl = book.typing().session().timeline(0).unwrap();
    assert!(tl.is_paused());
    assert_eq!(tl.progress(), at_pause);

    book.on_pointer_enter(SHOWN);
    book.tick(5_016.0);
    assert!(progress(&book, 0) > at_pause);
    assert!(book.typing().session().timeline(1).is_none());

    book.tick(5_270.0); // 100 + 16 + 254 = 370
    assert_eq!(book.typing().session().current_line(), 1);
    assert_eq!(book.typing().surface().lines[0], vec![1.0; 5]);
    assert!(book.typing().session().timeline(1).is_none());

    book.tick(5_500.0);
    assert!(book.typing().session().timeline(1).is_none());
    book.tick(5_570.0);
    assert!(book.typing().session().timeline(1).is_some());
}

#[test]
fn whole_letter_types_in_order() {
    let mut book = three_lines();
    book.tick(0.0);
    book.on_pointer_enter(SHOWN);
    let mut now = 0.0;
    let mut started = Vec::new();
    while now < 3_000.0 {
        now += 16.0;
        book.tick(now);
        let count = book.typing().session().timeline_count();
        if started.last() != Some(&count) {
            started.push(count);
        }
    }
    assert_eq!(started, vec![1, 2, 3]);
    assert_eq!(book.typing().session().current_line(), 3);
    for line in &book.typing().surface().lines {
        assert_eq!(line, &vec![1.0; 5]);
    }
    // lines scroll in typing order, never back to an earlier one
    let scrolls = &book.typing().surface().scrolls;
    assert!(scrolls.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn long_line_scrolls_while_typing_and_on_completion() {
    // 20 chars: 19 * 80 + 50 = 1570ms
    let source = LetterField::Text("abcdefghijklmnopqrst".into());
    let mut book = LetterBook::new(Page::default(), Box::new(source), TypingConfig::default());
    book.tick(0.0);
    book.on_pointer_enter(SHOWN);
    assert_eq!(book.typing().surface().scrolls, vec![0]); // before typing starts
    book.typing_mut().surface_mut().scrolls.clear();

    let mut now = 0.0;
    while now < 1_552.0 {
        now += 16.0;
        book.tick(now);
    }
    assert!(progress(&book, 0) < 1.0);
    // one scroll per tenth of progress past 20%: tenths 2 through 9
    assert_eq!(book.typing().surface().scrolls, vec![0; 8]);
    book.typing_mut().surface_mut().scrolls.clear();

    book.tick(1_570.0);
    assert_eq!(book.typing().session().current_line(), 1);
    assert_eq!(book.typing().surface().scrolls, vec![0]);
}

#[test]
fn progress_scrolls_stay_quiet_early_in_a_line() {
    let source = LetterField::Text("abcdefghijklmnopqrst".into());
    let mut book = LetterBook::new(Page::default(), Box::new(source), TypingConfig::default());
    book.tick(0.0);
    book.on_pointer_enter(SHOWN);
    book.typing_mut().surface_mut().scrolls.clear();
    book.tick(300.0); // under 20% of 1570ms
    assert!(book.typing().surface().scrolls.is_empty());
}

#[test]
fn hidden_guide_mid_typing_resets_session() {
    let mut book = three_lines();
    book.tick(0.0);
    book.on_pointer_enter(SHOWN);
    book.tick(500.0);
    book.tick(900.0);
    assert!(book.typing().session().timeline_count() >= 1);

    book.on_guide_class_changed(GuideState::Hidden);
    let session = book.typing().session();
    assert_eq!(session.current_line(), 0);
    assert_eq!(session.target_count(), 0);
    assert_eq!(session.timeline_count(), 0);
    assert!(!session.is_paused());
    let page = book.typing().surface();
    assert!(page.lines.is_empty());
    assert_eq!(page.placeholders, 3);
    assert!(!page.opened);

    // the next open starts over from the first line
    book.on_guide_class_changed(GuideState::Shown);
    book.on_pointer_enter(SHOWN);
    assert_eq!(book.typing().session().target_count(), 3);
    assert_eq!(progress(&book, 0), 0.0);
}

#[test]
fn start_twice_keeps_targets() {
    let mut book = three_lines();
    book.on_pointer_enter(SHOWN);
    book.on_pointer_enter(SHOWN);
    assert_eq!(book.typing().session().target_count(), 3);
    assert_eq!(book.typing().surface().lines.len(), 3);
    assert_eq!(book.typing().session().timeline_count(), 1);
}

#[test]
fn hover_sequences_keep_line_index_in_bounds() {
    let mut book = three_lines();
    let mut now = 0.0;
    let mut seed: u64 = 0x5eed;
    let mut last = 0;
    for _ in 0..2_000 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        match (seed >> 33) % 4 {
            0 => book.on_pointer_enter(SHOWN),
            1 => book.on_pointer_leave(SHOWN),
            _ => {
                now += ((seed >> 40) % 120) as f64;
                book.tick(now);
            }
        }
        let cur = book.typing().session().current_line();
        assert!(cur >= last, "line index went backwards");
        assert!(cur <= 3);
        last = cur;
    }
}

#[test]
fn empty_letter_hides_guide_and_types_nothing() {
    let mut book = LetterBook::new(
        Page::default(),
        Box::new(LetterField::Text("   ".into())),
        TypingConfig::default(),
    );
    book.on_pointer_enter(SHOWN);
    assert!(book.typing().surface().guide_hidden);
    assert_eq!(book.typing().session().target_count(), 0);
}
