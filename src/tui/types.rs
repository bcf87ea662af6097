/// Sub-views of the player details page, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubView {
    #[default]
    Basic,
    Riichi,
    Extended,
    WinLose,
    Luck,
    LargestLost,
    SameMatch,
}

impl SubView {
    pub const ALL: [SubView; 7] = [
        SubView::Basic,
        SubView::Riichi,
        SubView::Extended,
        SubView::WinLose,
        SubView::Luck,
        SubView::LargestLost,
        SubView::SameMatch,
    ];

    /// Route segment under the player page; the basic view is the index route
    pub fn path(self) -> &'static str {
        match self {
            SubView::Basic => "",
            SubView::Riichi => "riichi",
            SubView::Extended => "extended",
            SubView::WinLose => "win-lose",
            SubView::Luck => "luck",
            SubView::LargestLost => "largest-lost",
            SubView::SameMatch => "same-match",
        }
    }

    /// Tab title translation key
    pub fn title_key(self) -> &'static str {
        match self {
            SubView::Basic => "基本",
            SubView::Riichi => "立直",
            SubView::Extended => "更多",
            SubView::WinLose => "和铳分布",
            SubView::Luck => "血统",
            SubView::LargestLost => "最近大铳",
            SubView::SameMatch => "最常同桌",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&v| v == self).unwrap_or(0)
    }

    /// View for a 1-based tab number
    pub fn from_number(number: usize) -> Option<Self> {
        number.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Views that render from the extended stats bundle
    pub fn needs_extended_stats(self) -> bool {
        !matches!(self, SubView::Basic | SubView::SameMatch)
    }
}
