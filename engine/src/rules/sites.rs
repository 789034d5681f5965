// Built-in site table
//
// Order matters: host patterns are tried top to bottom and the first match
// owns the page (picasaweb.google.com must reach picasa before google).
// Rewrite replacements use `${n}` so a group number can be followed by text.

use super::{
    ImageNodeLocator, Rewrite, RuleError, SiteRule, SpecialSource, ThumbnailFilter,
    ZoomTransform,
};

const PROFILE_SIZE_SUFFIX: &str = r"_(bigger|mini|normal|reasonably_small)\.";

pub fn builtin_rules() -> Result<Vec<SiteRule>, RuleError> {
    Ok(vec![
        facebook()?,
        twitter()?,
        twitpic()?,
        linkedin()?,
        myspace()?,
        hi5()?,
        amazon()?,
        picasa()?,
        flickr()?,
        deviantart()?,
        photobucket()?,
        wikipedia()?,
        tagged()?,
        lastfm()?,
        google()?,
        youtube()?,
        dailymile()?,
        imdb()?,
        imgur()?,
        photosight()?,
    ])
}

fn facebook() -> Result<SiteRule, RuleError> {
    Ok(SiteRule::new(
        "facebook",
        "Facebook",
        r"\.facebook\.com",
        ThumbnailFilter::pattern(r"profile|photos-[a-z]\.((ak\.fbcdn)|(akamaihd))\.net/")?,
        ZoomTransform::first_match(vec![
            Rewrite::replace(r"_[qstan]\.", "_n.")?,
            Rewrite::replace(r"([0-9]/)[qsta]([0-9])", "${1}n${2}")?,
        ]),
    )?
    .with_special_source(SpecialSource::FacebookSprite)
    .with_image_node(ImageNodeLocator::Facebook))
}

fn twitter() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "twitter",
        "Twitter",
        r"twitter\.com",
        ThumbnailFilter::pattern(r"twimg\.com/profile_images/")?,
        ZoomTransform::first_match(vec![Rewrite::replace(PROFILE_SIZE_SUFFIX, ".")?]),
    )
}

fn twitpic() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "twitpic",
        "Twitpic",
        r"twitpic\.com",
        ThumbnailFilter::pattern(
            r"(twimg\.com/profile_images/)|(web[0-9][0-9]\.twitpic\.com/img)",
        )?,
        ZoomTransform::first_match(vec![
            Rewrite::replace(PROFILE_SIZE_SUFFIX, ".")?,
            Rewrite::replace(r"-(mini|thumb)\.", "-full.")?,
        ]),
    )
}

fn linkedin() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "linkedin",
        "LinkedIn",
        r"\.linkedin\.com",
        ThumbnailFilter::pattern(r"media[0-9][0-9]\.linkedin.com/mpr/")?,
        ZoomTransform::or_original(vec![Rewrite::replace(r"/shrink_[0-9][0-9]_[0-9][0-9]/", "/")?]),
    )
}

fn myspace() -> Result<SiteRule, RuleError> {
    Ok(SiteRule::new(
        "myspace",
        "MySpace",
        r"myspace\.com",
        ThumbnailFilter::pattern(r"images\.myspacecdn\.com")?,
        ZoomTransform::first_match(vec![
            Rewrite::replace(r"(?i-u)(/|_)[sml]\.", "${1}l.")?,
            Rewrite::replace(r"(?i-u)/(sml|med|lrg)_", "/lrg_")?,
        ]),
    )?
    .with_special_source(SpecialSource::LazyDataSrc))
}

fn hi5() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "hi5",
        "Hi5",
        r"\.hi5\.com",
        ThumbnailFilter::pattern(r"(photos[0-9]+|pics)\.hi5\.com")?,
        ZoomTransform::first_match(vec![
            Rewrite::replace(r"-01\.", "-02.")?,
            Rewrite::replace(r"\.small\.", ".")?,
        ]),
    )
}

fn amazon() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "amazon",
        "Amazon",
        r"www\.amazon\.[a-z]+",
        ThumbnailFilter::pattern(r"/(g-)?ecx\.images-amazon\.com/images")?,
        ZoomTransform::or_original(vec![Rewrite::replace(r"\._[a-zA-Z].+_\.", ".")?]),
    )
}

fn picasa() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "picasa",
        "Picasa",
        r"picasaweb\.google\.com",
        ThumbnailFilter::pattern(r"lh[0-9]+\.(ggpht|googleusercontent)\.com")?,
        ZoomTransform::first_match(vec![Rewrite::replace(
            r"/s([0-9]{2}|[123][0-9]{2})(-c)?/",
            "/s700/",
        )?]),
    )
}

fn flickr() -> Result<SiteRule, RuleError> {
    Ok(SiteRule::new(
        "flickr",
        "Flickr",
        r"www\.flickr\.com",
        ThumbnailFilter::pattern(r"farm[0-9]+\.static\.flickr\.com")?,
        ZoomTransform::first_match(vec![Rewrite::replace(r"_[smt]\.", ".")?]),
    )?
    .with_special_source(SpecialSource::FlickrSpaceball))
}

fn deviantart() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "deviantart",
        "deviantART",
        r"deviantart\.com",
        ThumbnailFilter::pattern(r"th[0-9]+\.deviantart.net")?,
        ZoomTransform::first_match(vec![Rewrite::replace(
            r"(fs[0-9]+/)[[:word:]]+/([fiop])",
            "${1}${2}",
        )?]),
    )
}

fn photobucket() -> Result<SiteRule, RuleError> {
    Ok(SiteRule::new(
        "photobucket",
        "PhotoBucket",
        r"photobucket\.com",
        ThumbnailFilter::pattern(r"[0-9]+\.photobucket.com/(albums|groups)")?,
        ZoomTransform::first_match(vec![Rewrite::replace(r"/th_", "/")?]),
    )?
    .with_image_node(ImageNodeLocator::PhotoBucket))
}

fn wikipedia() -> Result<SiteRule, RuleError> {
    // thumbnails live under /thumb/<hash>/<file>/<width>px-<file>; svg
    // thumbnails are rasterized and have no bitmap original
    SiteRule::new(
        "wikipedia",
        "Wikipedia",
        r"wikipedia\.org",
        ThumbnailFilter::pattern(r"upload\.wikimedia\.org/wikipedia/commons")?,
        ZoomTransform::first_match(vec![Rewrite::replace(r"/thumb/", "/")?
            .then_replace(r"(\.[a-zA-Z]+)/[0-9]+px-.+\.[a-zA-Z]+", "${1}")?
            .unless(r"\.svg")?]),
    )
}

fn tagged() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "tagged",
        "Tagged",
        r"\.tagged\.com",
        ThumbnailFilter::pattern(r"[a-z]+[0-9]+\.tagstat.com/image")?,
        ZoomTransform::first_match(vec![Rewrite::replace(
            r"/[1-9]0([[:word:]-]+\.[a-z]+)",
            "/00${1}",
        )?]),
    )
}

fn lastfm() -> Result<SiteRule, RuleError> {
    Ok(SiteRule::new(
        "lastfm",
        "Last.fm",
        r"www\.last\.fm",
        ThumbnailFilter::pattern(r"userserve-ak\.last\.fm/serve")?,
        ZoomTransform::first_match(vec![Rewrite::replace(r"/serve/[[:word:]]+/", "/serve/_/")?]),
    )?
    .with_image_node(ImageNodeLocator::LastFm))
}

fn google() -> Result<SiteRule, RuleError> {
    Ok(SiteRule::new(
        "google",
        "Google Images",
        r"\.google\.[a-z.]+",
        ThumbnailFilter::Any,
        ZoomTransform::identity(),
    )?
    .with_special_source(SpecialSource::GoogleImgUrl))
}

fn youtube() -> Result<SiteRule, RuleError> {
    Ok(SiteRule::new(
        "youtube",
        "YouTube",
        r"www\.youtube\.com",
        ThumbnailFilter::pattern(r"i[0-9]+\.ytimg\.com/vi/")?,
        ZoomTransform::first_match(vec![Rewrite::replace(r"/default\.", "/hqdefault.")?]),
    )?
    .with_special_source(SpecialSource::ProtocolRelative))
}

fn dailymile() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "dailymile",
        "Daily Mile",
        r"dailymile\.com",
        ThumbnailFilter::pattern(r"(dmimg|dailymile)\.com/(images|pictures|photos)/")?,
        ZoomTransform::or_original(vec![Rewrite::replace(
            r"_(mini|profile|preview|avatar)\.",
            ".",
        )?]),
    )
}

fn imdb() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "imdb",
        "IMDb",
        r"www\.imdb\.[a-z]+",
        ThumbnailFilter::pattern(r"ia\.media-imdb\.com/images/")?,
        ZoomTransform::first_match(vec![Rewrite::replace(r"\._.+_(\.[a-zA-Z]+)", "${1}")?]),
    )
}

fn imgur() -> Result<SiteRule, RuleError> {
    SiteRule::new(
        "imgur",
        "Imgur",
        r"imgur\.com",
        ThumbnailFilter::pattern(r"(i\.)?imgur\.com/")?,
        ZoomTransform::first_match(vec![Rewrite::replace(r"[bsmBSM](\.[a-zA-Z]+)", "${1}")?]),
    )
}

fn photosight() -> Result<SiteRule, RuleError> {
    // _icon, _crop_<n> and _top_of_day previews all have a _large sibling
    SiteRule::new(
        "photosight",
        "Photosight",
        r"photosight\.ru",
        ThumbnailFilter::pattern(r"\.photosight\.ru")?,
        ZoomTransform::first_match(vec![
            Rewrite::replace(r"_(icon)\.", "_large.")?,
            Rewrite::replace(r"_(crop)_[0-9]+\.", "_large.")?,
            Rewrite::replace(r"_top_of_day\.", "_large.")?,
        ]),
    )
}
