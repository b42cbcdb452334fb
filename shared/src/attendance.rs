//! 点名网格的纯计算部分：按参与者分组出勤记录、按姓名筛选成员，
//! 以及打开会话与更新出勤的状态机

use std::collections::HashMap;

use crate::{AttendanceItem, AttendanceStatus, AttendanceSummary, Member, SessionWithMembers};

/// participantId -> 出勤记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceIndex {
    by_participant: HashMap<String, AttendanceItem>,
}

impl AttendanceIndex {
    pub fn new(summary: &AttendanceSummary) -> Self {
        let by_participant = summary
            .items
            .iter()
            .map(|item| (item.participant_id.clone(), item.clone()))
            .collect();
        Self { by_participant }
    }

    pub fn get(&self, participant_id: &str) -> Option<&AttendanceItem> {
        self.by_participant.get(participant_id)
    }

    pub fn status_of(&self, participant_id: &str) -> Option<AttendanceStatus> {
        self.get(participant_id).map(|item| item.status)
    }

    pub fn len(&self) -> usize {
        self.by_participant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_participant.is_empty()
    }
}

/// 按姓名做大小写不敏感的子串匹配；空查询返回全部成员
pub fn filter_members(members: &[Member], query: &str) -> Vec<Member> {
    let needle = query.to_lowercase();
    members
        .iter()
        .filter(|m| m.full_name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

// =========================================================
// 点名状态 (ChamadaState)
// =========================================================

/// 一次出勤写入对应的读取序号
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReadSeq(u64);

/// 点名面板的状态：当前会话、最近一次应用的权威读取、打开请求是否进行中。
///
/// 写入按发起顺序编号；读取结果只要比已应用的更新就会被应用，
/// 因此一次成功写入的读取不会因为后发起的写入失败而丢失。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChamadaState {
    session: Option<SessionWithMembers>,
    summary: AttendanceSummary,
    opening: bool,
    issued: u64,
    applied: u64,
}

impl ChamadaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> Option<&SessionWithMembers> {
        self.session.as_ref()
    }

    pub fn summary(&self) -> Option<&AttendanceSummary> {
        self.session.as_ref().map(|_| &self.summary)
    }

    pub fn is_opening(&self) -> bool {
        self.opening
    }

    /// 开始打开会话；已有打开请求进行中时返回 false，调用方应忽略本次提交
    pub fn begin_open(&mut self) -> bool {
        if self.opening {
            return false;
        }
        self.opening = true;
        true
    }

    /// 新会话及其首次读取；之前会话未完成的读取全部作废
    pub fn open_succeeded(&mut self, session: SessionWithMembers, summary: AttendanceSummary) {
        self.opening = false;
        self.session = Some(session);
        self.summary = summary;
        self.applied = self.issued;
    }

    /// 打开失败时清除旧会话，之后的点击不会写到其它日期的会话
    pub fn open_failed(&mut self) {
        self.opening = false;
        self.session = None;
        self.summary = AttendanceSummary::default();
        self.applied = self.issued;
    }

    /// 开始一次写入，返回目标会话 id 与读取序号；没有会话时返回 None
    pub fn begin_write(&mut self) -> Option<(String, ReadSeq)> {
        let session_id = self.session.as_ref()?.id.clone();
        self.issued += 1;
        Some((session_id, ReadSeq(self.issued)))
    }

    /// 应用写入后的权威读取。会话已更换或已应用更新的读取时返回 false
    pub fn apply_read(&mut self, session_id: &str, seq: ReadSeq, summary: AttendanceSummary) -> bool {
        let same_session = self.session.as_ref().is_some_and(|s| s.id == session_id);
        if !same_session || seq.0 <= self.applied {
            return false;
        }
        self.applied = seq.0;
        self.summary = summary;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttendanceParticipant;

    fn member(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            full_name: name.to_string(),
            email: None,
            phone: None,
        }
    }

    fn item(participant_id: &str, status: AttendanceStatus) -> AttendanceItem {
        AttendanceItem {
            id: format!("a-{}", participant_id),
            participant_id: participant_id.to_string(),
            status,
            justification_reason: None,
            participant: AttendanceParticipant {
                id: participant_id.to_string(),
                full_name: participant_id.to_uppercase(),
            },
        }
    }

    #[test]
    fn test_index_by_participant() {
        let summary = AttendanceSummary {
            items: vec![
                item("p1", AttendanceStatus::Present),
                item("p2", AttendanceStatus::Justified),
            ],
            total: 2,
            present: 1,
            absent: 0,
            justified: 1,
        };
        let index = AttendanceIndex::new(&summary);

        assert_eq!(index.len(), 2);
        assert_eq!(index.status_of("p1"), Some(AttendanceStatus::Present));
        assert_eq!(index.status_of("p2"), Some(AttendanceStatus::Justified));
        assert_eq!(index.status_of("p3"), None);
    }

    #[test]
    fn test_filter_members_case_insensitive() {
        let members = vec![
            member("1", "João Silva"),
            member("2", "Maria JOANA"),
            member("3", "Pedro"),
        ];

        let found = filter_members(&members, "jo");
        assert_eq!(
            found.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["1", "2"]
        );
        assert_eq!(filter_members(&members, "").len(), 3);
        assert!(filter_members(&members, "zé").is_empty());
        assert_eq!(filter_members(&members, "JOÃO").len(), 1);
    }

    fn session(id: &str) -> SessionWithMembers {
        SessionWithMembers {
            id: id.to_string(),
            session_date: "2024-03-05".to_string(),
            members: vec![member("p1", "João"), member("p2", "Maria")],
        }
    }

    fn counts(present: u32, absent: u32) -> AttendanceSummary {
        AttendanceSummary {
            items: Vec::new(),
            total: present + absent,
            present,
            absent,
            justified: 0,
        }
    }

    #[test]
    fn test_open_ignored_while_pending() {
        let mut state = ChamadaState::new();
        assert!(state.begin_open());
        assert!(!state.begin_open());
        assert!(state.is_opening());

        state.open_succeeded(session("s1"), counts(0, 0));
        assert!(!state.is_opening());
        assert!(state.begin_open());
    }

    #[test]
    fn test_failed_open_clears_previous_session() {
        let mut state = ChamadaState::new();
        state.begin_open();
        state.open_succeeded(session("s1"), counts(1, 0));

        // 换一个日期再次打开，请求失败
        assert!(state.begin_open());
        state.open_failed();

        assert!(state.session().is_none());
        assert!(state.summary().is_none());
        assert_eq!(state.begin_write(), None);
    }

    #[test]
    fn test_successful_read_survives_later_failed_write() {
        let mut state = ChamadaState::new();
        state.begin_open();
        state.open_succeeded(session("s1"), counts(0, 0));

        let (sid_a, seq_a) = state.begin_write().unwrap();
        let (_sid_b, _seq_b) = state.begin_write().unwrap();

        // A 成功并读取；B 随后失败，不产生读取
        assert!(state.apply_read(&sid_a, seq_a, counts(1, 0)));
        assert_eq!(state.summary(), Some(&counts(1, 0)));
    }

    #[test]
    fn test_older_read_does_not_overwrite_newer() {
        let mut state = ChamadaState::new();
        state.begin_open();
        state.open_succeeded(session("s1"), counts(0, 0));

        let (sid, seq_a) = state.begin_write().unwrap();
        let (_, seq_b) = state.begin_write().unwrap();

        assert!(state.apply_read(&sid, seq_b, counts(2, 0)));
        assert!(!state.apply_read(&sid, seq_a, counts(1, 0)));
        assert_eq!(state.summary(), Some(&counts(2, 0)));
    }

    #[test]
    fn test_read_for_replaced_session_is_dropped() {
        let mut state = ChamadaState::new();
        state.begin_open();
        state.open_succeeded(session("s1"), counts(0, 0));
        let (sid, seq) = state.begin_write().unwrap();

        state.begin_open();
        state.open_succeeded(session("s2"), counts(0, 3));

        assert!(!state.apply_read(&sid, seq, counts(1, 0)));
        assert_eq!(state.summary(), Some(&counts(0, 3)));
    }
}
