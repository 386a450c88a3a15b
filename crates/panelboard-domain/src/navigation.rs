use crate::settings::Settings;
use crate::view::ViewId;
use panelboard_core::{PanelboardResult, TabController, TabHandle};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "tab", rename_all = "lowercase")]
pub enum Navigation {
    /// An open tab already showed the view; it was reloaded and focused.
    Reused(TabHandle),
    Created(TabHandle),
}

impl Navigation {
    pub fn tab(self) -> TabHandle {
        match self {
            Navigation::Reused(tab) | Navigation::Created(tab) => tab,
        }
    }
}

/// Bring `view` to the front, reloading an existing tab so it shows fresh storage.
pub async fn navigate_to_view(
    tabs: &dyn TabController,
    view: ViewId,
) -> PanelboardResult<Navigation> {
    let url = view.page_url();
    if let Some(tab) = tabs.find_tabs(url).await?.into_iter().next() {
        tabs.reload(tab).await?;
        tabs.focus(tab).await?;
        return Ok(Navigation::Reused(tab));
    }
    Ok(Navigation::Created(tabs.create_tab(url).await?))
}

/// What the first page opened at launch should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupPlan {
    /// View the launching tab ends up showing.
    pub show: ViewId,
    /// Views opened as additional background tabs.
    pub open_in_background: Vec<ViewId>,
}

impl StartupPlan {
    pub fn from_settings(settings: &Settings) -> Self {
        let mut views = settings.startup_views().into_iter();
        let show = views.next().unwrap_or(ViewId::A);
        Self {
            show,
            open_in_background: views.collect(),
        }
    }

    pub async fn open_background_tabs(
        &self,
        tabs: &dyn TabController,
    ) -> PanelboardResult<Vec<TabHandle>> {
        let mut opened = Vec::with_capacity(self.open_in_background.len());
        for view in &self.open_in_background {
            opened.push(tabs.create_tab(view.page_url()).await?);
        }
        Ok(opened)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelboard_persistence::LocalTabHub;

    #[tokio::test]
    async fn test_navigate_reuses_open_tab() {
        let tabs = LocalTabHub::new();
        let (existing, _rx) = tabs.open_tab(ViewId::B.page_url());
        let nav = navigate_to_view(&tabs, ViewId::B).await.unwrap();
        assert_eq!(nav, Navigation::Reused(existing));
        assert_eq!(tabs.focused(), Some(existing));
    }

    #[tokio::test]
    async fn test_navigate_creates_missing_tab() {
        let tabs = LocalTabHub::new();
        let nav = navigate_to_view(&tabs, ViewId::C).await.unwrap();
        assert!(matches!(nav, Navigation::Created(_)));
        assert_eq!(tabs.find_tabs("panelC.html").await.unwrap(), vec![nav.tab()]);
    }

    #[test]
    fn test_startup_plan_redirects_when_a_unwanted() {
        let settings = Settings {
            startup_a: false,
            startup_b: true,
            startup_c: true,
            ..Default::default()
        };
        let plan = StartupPlan::from_settings(&settings);
        assert_eq!(plan.show, ViewId::B);
        assert_eq!(plan.open_in_background, vec![ViewId::C]);

        let plan = StartupPlan::from_settings(&Settings::default());
        assert_eq!(plan.show, ViewId::A);
        assert!(plan.open_in_background.is_empty());
    }
}
