//! 結合テスト: 公開 API（`Agent::choose_move`）で代表的な局面の手を確認する。

/// 統合テスト本体。
#[cfg(test)]
mod tests {
    use core::time::Duration;
    use yonmoku_core::ai::alphabeta::{Agent, Decision};
    use yonmoku_core::ai::EngineConfig;
    use yonmoku_core::engine::{Color, Snapshot};
    use yonmoku_core::error::{AgentError, BoardError};

    /// 固定深さで読み切るのに十分な持ち時間。
    const BUDGET: Duration = Duration::from_secs(60);

    const ALL_OPEN: [bool; 7] = [true; 7];

    fn snapshot(text: &str) -> Snapshot {
        match Snapshot::parse(text) {
            Ok(value) => value,
            Err(err) => panic!("snapshot must parse: {err}"),
        }
    }

    fn empty_board() -> Snapshot {
        match Snapshot::empty(6, 7) {
            Ok(value) => value,
            Err(err) => panic!("6x7 must be supported: {err}"),
        }
    }

    /// 空の盤面ではどの深さでも中央を選ぶ。
    #[test]
    fn empty_board_opens_in_the_center() {
        for depth in 1_u8..=4 {
            let mut agent = Agent::new(EngineConfig::minimax(depth));
            let report = agent.analyze(&empty_board(), &ALL_OPEN, Color::Red, BUDGET);
            assert!(report.is_ok(), "analyze failed: {report:?}");
            let Ok(report) = report else { return };
            assert_eq!(report.column(), 3, "depth {depth}");
            assert_eq!(report.decision(), Decision::Search);
            assert_eq!(report.completed_depth(), depth);
        }
    }

    /// 下段の 3 連を自分で完成させる。
    #[test]
    fn completes_own_bottom_row() {
        let board = snapshot(
            "
            .......
            .......
            .......
            .......
            OO.....
            XXX...O
            ",
        );
        for config in [
            EngineConfig::tactical(),
            EngineConfig::minimax_default(),
            EngineConfig::advanced(),
        ] {
            let mut agent = Agent::new(config);
            let report = agent.analyze(&board, &ALL_OPEN, Color::Red, BUDGET);
            assert_eq!(
                report.map(|value| (value.column(), value.decision())),
                Ok((3, Decision::ImmediateWin))
            );
        }
    }

    /// 相手の下段の 3 連を止める。
    #[test]
    fn blocks_opponent_bottom_row() {
        let board = snapshot(
            "
            .......
            .......
            .......
            .......
            ....X..
            OOO.X..
            ",
        );
        let mut agent = Agent::default();
        let report = agent.analyze(&board, &ALL_OPEN, Color::Red, Duration::from_millis(200));
        assert_eq!(
            report.map(|value| (value.column(), value.decision())),
            Ok((3, Decision::RequiredBlock))
        );
    }

    /// 満杯の列はマスクで除かれていれば選ばない。
    #[test]
    fn never_plays_a_full_column() {
        let board = snapshot(
            "
            O......
            X......
            O......
            X......
            O......
            X......
            ",
        );
        let mask = [false, true, true, true, true, true, true];
        for config in [EngineConfig::tactical(), EngineConfig::minimax(3)] {
            let mut agent = Agent::new(config);
            let column = agent.choose_move(&board, &mask, Color::Red, BUDGET);
            assert!(column.is_ok(), "choose_move failed: {column:?}");
            assert_ne!(column, Ok(0));
        }

        // マスクが満杯の列を着手可能としているのは契約違反。
        let mut agent = Agent::default();
        assert_eq!(
            agent.choose_move(&board, &ALL_OPEN, Color::Red, BUDGET),
            Err(AgentError::MaskedColumnFull { column: 0 })
        );
    }

    /// マスクで許された列だけを返す。
    #[test]
    fn respects_a_sparse_mask() {
        let mask = [false, true, false, true, false, true, false];
        let mut agent = Agent::new(EngineConfig::advanced());
        let column = agent.choose_move(&empty_board(), &mask, Color::Red, Duration::from_millis(50));
        assert!(matches!(column, Ok(1 | 3 | 5)), "got {column:?}");
    }

    /// 斜めの 3 連を完成させる列を選ぶ。
    #[test]
    fn completes_a_diagonal() {
        let board = snapshot(
            "
            .......
            .......
            .......
            ...XO..
            ..XOO..
            .XOOX..
            ",
        );
        let mut agent = Agent::new(EngineConfig::minimax_default());
        let column = agent.choose_move(&board, &ALL_OPEN, Color::Red, BUDGET);
        assert_eq!(column, Ok(4));
    }

    /// 観測平面（手番側がチャンネル 0）からも同じ判断をする。
    #[test]
    fn planes_and_text_agree() {
        let text = snapshot(
            "
            .......
            .......
            .......
            .......
            .......
            OOO.X.X
            ",
        );
        let mut planes = vec![0_u8; 6 * 7 * 2];
        for row in 0..6_u8 {
            for column in 0..7_u8 {
                let index = (usize::from(row) * 7 + usize::from(column)) * 2;
                match text.cell(row, column) {
                    Some(Color::Red) => planes[index] = 1,
                    Some(_) => planes[index + 1] = 1,
                    None => {}
                }
            }
        }
        let from_planes = Snapshot::from_planes(6, 7, &planes, Color::Red);
        assert_eq!(from_planes.as_ref(), Ok(&text));

        let mut agent = Agent::new(EngineConfig::tactical());
        assert_eq!(agent.choose_move(&text, &ALL_OPEN, Color::Red, BUDGET), Ok(3));
    }

    /// 呼び出し側の契約違反はエラーとして返す。
    #[test]
    fn contract_violations_are_errors() {
        let mut agent = Agent::default();
        let board = empty_board();

        assert_eq!(
            agent.choose_move(&board, &[false; 7], Color::Red, BUDGET),
            Err(AgentError::NoLegalMove)
        );
        assert_eq!(
            agent.choose_move(&board, &[true; 6], Color::Red, BUDGET),
            Err(AgentError::MaskLength {
                actual: 6,
                expected: 7
            })
        );

        let floating = snapshot(
            "
            .......
            .......
            .......
            .......
            ...X...
            .......
            ",
        );
        assert_eq!(
            agent.choose_move(&floating, &ALL_OPEN, Color::Red, BUDGET),
            Err(AgentError::Board(BoardError::FloatingDisc { row: 4, column: 3 }))
        );
    }
}
