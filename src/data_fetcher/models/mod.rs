pub mod espn;
pub mod game;

pub use espn::{
    EspnCompetition, EspnCompetitor, EspnEvent, EspnLeagueEntry, EspnScore, EspnSportEntry,
    EspnStatus, EspnStatusType, EspnTeam, EspnTeamEntry, ScoreboardResponse, TeamsResponse,
};
pub use game::{FavoriteTeams, Game, LeagueTarget, StatusState};
