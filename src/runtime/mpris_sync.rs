use crate::app::App;
use crate::mpris::MprisHandle;

pub fn update_mpris(mpris: &MprisHandle, app: &App) {
    mpris.set_now_playing(app.current_track());
    mpris.set_playback(app.playback);
}
