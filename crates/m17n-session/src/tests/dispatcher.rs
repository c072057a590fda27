use m17n_core::settings::{Color, Orientation, UnderlineStyle};

use super::*;
use crate::dispatcher::CallbackDispatcher;

fn dispatcher() -> (CallbackDispatcher, ContextId) {
    let id = ContextId::next();
    let mut d = CallbackDispatcher::new(Some("SI".to_string()), status_property());
    d.bind(id);
    (d, id)
}

fn fire(
    d: &mut CallbackDispatcher,
    host: &mut RecordingHost,
    config: EngineConfig,
    id: ContextId,
    command: Command,
    state: &mut ContextState,
) {
    d.with_host(host, config).callback(id, command, state);
}

fn groups(sizes: &[usize]) -> Vec<CandidateGroup> {
    sizes
        .iter()
        .map(|&n| CandidateGroup::Text(MText::from("abcdefghij".get(..n).unwrap_or_default())))
        .collect()
}

// --- binding ---

#[test]
fn test_first_callback_binds_and_foreign_is_ignored() {
    let mut d = CallbackDispatcher::new(None, status_property());
    let mut host = RecordingHost::new();
    let mut state = ContextState::default();
    let own = ContextId::next();
    let foreign = ContextId::next();

    fire(&mut d, &mut host, plain_config(), own, Command::PreeditStart, &mut state);
    assert_eq!(d.bound(), Some(own));
    d.bind(foreign);
    assert_eq!(d.bound(), Some(own));

    host.take();
    fire(&mut d, &mut host, plain_config(), foreign, Command::PreeditStart, &mut state);
    assert!(host.calls.is_empty());
}

// --- preedit ---

#[test]
fn test_preedit_draw_attributes() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    let mut state = ContextState {
        preedit: MText::from("ශ්‍රී"),
        cursor_pos: 2,
        ..ContextState::default()
    };

    fire(&mut d, &mut host, plain_config(), id, Command::PreeditDraw, &mut state);
    assert_eq!(
        host.take(),
        vec![HostCall::UpdatePreedit {
            text: "ශ්‍රී".to_string(),
            cursor: 2,
            visible: true,
            mode: PreeditFocusMode::Commit,
            attributes: vec![AttributeKind::Underline(UnderlineStyle::None)],
        }]
    );

    let config = EngineConfig {
        preedit_foreground: Some(Color(0x000000)),
        preedit_background: Some(Color(0xd1eaff)),
        preedit_underline: UnderlineStyle::Single,
        preedit_focus_mode: PreeditFocusMode::Clear,
        ..plain_config()
    };
    fire(&mut d, &mut host, config, id, Command::PreeditDraw, &mut state);
    match &host.calls[0] {
        HostCall::UpdatePreedit {
            attributes, mode, ..
        } => {
            assert_eq!(
                attributes,
                &vec![
                    AttributeKind::Foreground(Color(0x000000)),
                    AttributeKind::Background(Color(0xd1eaff)),
                    AttributeKind::Underline(UnderlineStyle::Single),
                ]
            );
            assert_eq!(*mode, PreeditFocusMode::Clear);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(d.preedit().cursor, 2);
    assert!(d.preedit().visible);
}

#[test]
fn test_undecodable_preedit_keeps_previous() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    let mut state = ContextState {
        preedit: MText::from_code_points(vec![0xD800]),
        ..ContextState::default()
    };
    fire(&mut d, &mut host, plain_config(), id, Command::PreeditDraw, &mut state);
    assert!(host.calls.is_empty());
    assert!(d.preedit().text.is_empty());
}

#[test]
fn test_start_and_done_hide() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    let mut state = ContextState::default();
    for command in [Command::PreeditStart, Command::PreeditDone, Command::StatusStart] {
        fire(&mut d, &mut host, plain_config(), id, command, &mut state);
    }
    for command in [Command::CandidatesStart, Command::CandidatesDone] {
        fire(&mut d, &mut host, plain_config(), id, command, &mut state);
    }
    for command in [Command::StatusDone, Command::SetSpot, Command::Toggle, Command::Reset] {
        fire(&mut d, &mut host, plain_config(), id, command, &mut state);
    }
    assert_eq!(
        host.calls,
        vec![
            HostCall::HidePreedit,
            HostCall::HidePreedit,
            HostCall::HidePreedit,
            HostCall::HideTable,
            HostCall::HideAux,
            HostCall::HideTable,
            HostCall::HideAux,
        ]
    );
}

// --- status ---

#[test]
fn test_status_hidden_when_empty_or_title() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    let mut state = ContextState {
        status: MText::from("අ"),
        ..ContextState::default()
    };

    fire(&mut d, &mut host, plain_config(), id, Command::StatusDraw, &mut state);
    assert_eq!(d.status_property().label.as_deref(), Some("අ"));
    assert!(d.status_property().visible);

    state.status = MText::from("SI");
    fire(&mut d, &mut host, plain_config(), id, Command::StatusDraw, &mut state);
    assert_eq!(d.status_property().label, None);
    assert!(!d.status_property().visible);

    state.status = MText::new();
    fire(&mut d, &mut host, plain_config(), id, Command::StatusDraw, &mut state);
    assert!(!d.status_property().visible);

    // Every draw pushes the property, visible or not.
    let pushes = host
        .calls
        .iter()
        .filter(|c| matches!(c, HostCall::UpdateProperty { key, .. } if key == "status"))
        .count();
    assert_eq!(pushes, 3);
}

// --- candidates ---

#[test]
fn test_candidates_draw_locates_group() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    let mut state = ContextState {
        candidate_list: groups(&[5, 5, 5]),
        candidate_index: 7,
        candidate_show: true,
        ..ContextState::default()
    };
    let config = EngineConfig {
        lookup_table_orientation: Orientation::Vertical,
        ..plain_config()
    };

    fire(&mut d, &mut host, config, id, Command::CandidatesDraw, &mut state);
    assert_eq!(
        host.calls,
        vec![
            HostCall::UpdateTable {
                candidates: ["a", "b", "c", "d", "e"].map(String::from).to_vec(),
                cursor: 2,
                page_size: 5,
            },
            HostCall::UpdateAux("( 2 / 3 )".to_string()),
        ]
    );
    assert_eq!(d.lookup_table().orientation, Orientation::Vertical);
}

#[test]
fn test_candidates_hidden_when_not_shown_or_out_of_range() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    let mut state = ContextState {
        candidate_list: groups(&[2, 2]),
        candidate_index: 1,
        candidate_show: false,
        ..ContextState::default()
    };
    fire(&mut d, &mut host, plain_config(), id, Command::CandidatesDraw, &mut state);

    state.candidate_show = true;
    state.candidate_index = 9;
    fire(&mut d, &mut host, plain_config(), id, Command::CandidatesDraw, &mut state);

    state.candidate_list.clear();
    fire(&mut d, &mut host, plain_config(), id, Command::CandidatesDraw, &mut state);

    let hidden: Vec<HostCall> = std::iter::repeat([HostCall::HideTable, HostCall::HideAux])
        .take(3)
        .flatten()
        .collect();
    assert_eq!(host.calls, hidden);
    assert!(d.lookup_table().candidates.is_empty());
}

// --- surrounding text ---

#[test]
fn test_get_surrounding_text_fills_request() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    host.surrounding = SurroundingText {
        text: "0123456789abcdefghij".to_string(),
        cursor_pos: 10,
        anchor_pos: 10,
    };
    let mut state = ContextState {
        request: RequestSlot::Span(-4),
        ..ContextState::default()
    };
    fire(&mut d, &mut host, plain_config(), id, Command::GetSurroundingText, &mut state);
    assert_eq!(state.request, RequestSlot::Text(MText::from("6789")));

    state.request = RequestSlot::Span(3);
    fire(&mut d, &mut host, plain_config(), id, Command::GetSurroundingText, &mut state);
    assert_eq!(state.request, RequestSlot::Text(MText::from("abc")));

    state.request = RequestSlot::Span(0);
    fire(&mut d, &mut host, plain_config(), id, Command::GetSurroundingText, &mut state);
    assert_eq!(state.request, RequestSlot::Text(MText::new()));
}

#[test]
fn test_delete_surrounding_text_sign_convention() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    let mut state = ContextState::default();

    for span in [-4, 3, 0] {
        state.request = RequestSlot::Span(span);
        fire(&mut d, &mut host, plain_config(), id, Command::DeleteSurroundingText, &mut state);
    }
    assert_eq!(host.calls, vec![HostCall::Delete(-4, 4), HostCall::Delete(0, 3)]);
}

#[test]
fn test_surrounding_text_requires_capability() {
    let (mut d, id) = dispatcher();
    let mut host = RecordingHost::new();
    host.capabilities = Capabilities::PREEDIT_TEXT | Capabilities::LOOKUP_TABLE;
    let mut state = ContextState {
        request: RequestSlot::Span(-2),
        ..ContextState::default()
    };
    fire(&mut d, &mut host, plain_config(), id, Command::GetSurroundingText, &mut state);
    fire(&mut d, &mut host, plain_config(), id, Command::DeleteSurroundingText, &mut state);
    assert!(host.calls.is_empty());
    assert_eq!(state.request, RequestSlot::Span(-2));
}
